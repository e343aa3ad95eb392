use chrono::{Duration, Utc};
use weave_core::config::OptimizerConfig;
use weave_core::ContextEntry;
use weave_optimizer::{total_tokens, ContextOptimizer, FitTier};

fn make_test_entry(text: &str, tokens: usize, relevance: f64) -> ContextEntry {
    ContextEntry::new("test", text, relevance).with_token_count(tokens)
}

fn paragraph(template: fn(usize) -> String, sentences: usize) -> String {
    (0..sentences)
        .map(template)
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Budget ceiling ────────────────────────────────────────────────────────

#[test]
fn budget_ceiling_keeps_first_entry_only() {
    let optimizer = ContextOptimizer::default();
    let entries = vec![
        make_test_entry("first entry body", 100, 0.9),
        make_test_entry("second entry body", 100, 0.2),
    ];
    let (out, report) = optimizer.optimize_with_report(entries, 150, Utc::now());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].render(), "first entry body");
    assert_eq!(total_tokens(&out), 100);
    assert_eq!(report.tier, FitTier::Moderate);
    assert_eq!(report.dropped_by_fit, 1);
}

// ── No-op ─────────────────────────────────────────────────────────────────

#[test]
fn within_budget_is_untouched_even_with_duplicates_and_expired() {
    let now = Utc::now();
    let entries = vec![
        make_test_entry("dup", 10, 0.5),
        make_test_entry("dup", 10, 0.5),
        make_test_entry("old", 10, 0.5)
            .with_created_at(now - Duration::hours(2))
            .with_ttl(Duration::hours(1)),
    ];
    let (out, report) = ContextOptimizer::default().optimize_with_report(entries.clone(), 30, now);
    assert_eq!(out, entries);
    assert_eq!(report.tier, FitTier::WithinBudget);
    assert_eq!(report.tokens_saved(), 0);
}

// ── Pipeline stages ───────────────────────────────────────────────────────

#[test]
fn over_budget_runs_expire_and_dedup_before_fitting() {
    let now = Utc::now();
    let entries = vec![
        make_test_entry("alpha beta gamma", 40, 0.9),
        make_test_entry("alpha beta gamma", 40, 0.9),
        make_test_entry("expired stuff", 40, 0.9)
            .with_created_at(now - Duration::minutes(30))
            .with_ttl(Duration::minutes(10)),
        make_test_entry("delta epsilon", 30, 0.9),
    ];
    let (out, report) = ContextOptimizer::default().optimize_with_report(entries, 100, now);
    assert_eq!(report.expired_removed, 1);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.tier, FitTier::WithinBudget);
    assert_eq!(total_tokens(&out), 70);
    assert_eq!(out.len(), 2);
}

#[test]
fn unrepresentable_ttls_survive_expiry() {
    let mut far = make_test_entry("far future entry", 60, 0.9);
    far.ttl_secs = Some(1_000_000_000_000_000);
    let mut forever = make_test_entry("forever entry body", 60, 0.8);
    forever.ttl_secs = Some(u64::MAX);

    let (out, report) =
        ContextOptimizer::default().optimize_with_report(vec![far, forever], 100, Utc::now());
    assert_eq!(report.expired_removed, 0);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].render(), "far future entry");
}

#[test]
fn oversized_entries_are_compressed() {
    let text = "the value of the flag is read from the config file ".repeat(300);
    let entry = ContextEntry::new("docs", text.as_str(), 0.9);
    assert!(entry.token_count > 1_000);
    let budget = entry.token_count - 1;

    let (out, report) =
        ContextOptimizer::default().optimize_with_report(vec![entry], budget, Utc::now());
    assert_eq!(report.compressed, 1);
    assert!(out[0].compressed);
    assert!(out[0].token_count < budget);
    assert!(!out[0].render().contains(" the "));
}

// ── Aggressive tier ───────────────────────────────────────────────────────

#[test]
fn aggressive_tier_summarizes_when_nothing_fits() {
    let entries = vec![
        ContextEntry::new(
            "docs",
            paragraph(|i| format!("Sentence number {i} talks about caching."), 20).as_str(),
            0.9,
        ),
        ContextEntry::new(
            "chat",
            paragraph(|i| format!("Reviewers asked in thread {i} whether eviction works."), 20)
                .as_str(),
            0.5,
        ),
    ];
    assert!(entries.iter().all(|e| e.token_count > 60));

    let (out, report) =
        ContextOptimizer::default().optimize_with_report(entries, 60, Utc::now());
    assert_eq!(report.tier, FitTier::Summarized);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].source, "docs");
    assert!(out[0].summarized);
    assert!(out[0].token_count <= 60);
}

#[test]
fn lone_oversized_entry_is_reported_as_is() {
    let entries = vec![make_test_entry("one block", 5_000, 0.3)];
    let out = ContextOptimizer::default().optimize(entries, 1_000);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].token_count, 5_000);
}

// ── Config ────────────────────────────────────────────────────────────────

#[test]
fn custom_relevance_floor_is_honored() {
    let config = OptimizerConfig {
        min_relevance_score: 0.5,
        ..OptimizerConfig::default()
    };
    let optimizer = ContextOptimizer::new(config);
    let entries = vec![
        make_test_entry("low", 50, 0.4),
        make_test_entry("high", 50, 0.6),
        make_test_entry("mid", 40, 0.5),
    ];
    let out = optimizer.optimize(entries, 100);
    let texts: Vec<String> = out.iter().map(ContextEntry::render).collect();
    assert_eq!(texts, vec!["high", "mid"]);
}

// ── Auxiliary operations ──────────────────────────────────────────────────

#[test]
fn streaming_chunks_cover_every_entry_in_order() {
    let entries: Vec<ContextEntry> = (0..10)
        .map(|i| make_test_entry(&format!("e{i}"), 30, 0.5))
        .collect();
    let chunks = ContextOptimizer::default().chunk_for_streaming(entries, 100);
    assert_eq!(chunks.len(), 4);
    let flat: Vec<String> = chunks.into_iter().flatten().map(|e| e.render()).collect();
    assert_eq!(flat, (0..10).map(|i| format!("e{i}")).collect::<Vec<_>>());
}

#[test]
fn estimate_savings_matches_actual_removals() {
    let now = Utc::now();
    let entries = vec![
        make_test_entry("x y z", 100, 0.9),
        make_test_entry("x y z", 100, 0.9),
        make_test_entry("w", 100, 0.9),
    ];
    let optimizer = ContextOptimizer::default();
    let estimate = optimizer.estimate_savings(&entries, 150, now);
    assert_eq!(estimate.duplicate_tokens, 100);
    assert_eq!(estimate.over_budget_tokens, 50);

    let (_, report) = optimizer.optimize_with_report(entries, 150, now);
    assert_eq!(report.duplicates_removed, 1);
}
