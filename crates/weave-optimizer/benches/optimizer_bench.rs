use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use weave_core::ContextEntry;
use weave_optimizer::ContextOptimizer;

/// 500 entries, ~20% near-duplicates, mixed ages and relevance.
fn build_entries() -> Vec<ContextEntry> {
    let now = Utc::now();
    (0..500)
        .map(|i| {
            let topic = i % 400;
            let text = format!("entry {topic} describes module {topic} and its public functions");
            ContextEntry::new(format!("source-{}", i % 5), text.as_str(), (i % 10) as f64 / 10.0)
                .with_created_at(now - Duration::minutes((i % 120) as i64))
                .with_token_count(50 + (i % 7) * 10)
        })
        .collect()
}

fn bench_optimize_moderate(c: &mut Criterion) {
    let entries = build_entries();
    let optimizer = ContextOptimizer::default();
    let total: usize = entries.iter().map(|e| e.token_count).sum();
    let budget = (total as f64 / 1.2) as usize;
    c.bench_function("optimize_moderate_500", |b| {
        b.iter(|| optimizer.optimize(black_box(entries.clone()), budget))
    });
}

fn bench_optimize_aggressive(c: &mut Criterion) {
    let entries = build_entries();
    let optimizer = ContextOptimizer::default();
    c.bench_function("optimize_aggressive_500", |b| {
        b.iter(|| optimizer.optimize(black_box(entries.clone()), 4_000))
    });
}

criterion_group!(benches, bench_optimize_moderate, bench_optimize_aggressive);
criterion_main!(benches);
