use std::sync::Arc;

use weave_core::errors::SourceError;
use weave_core::models::*;

fn make_test_source(weight: f64) -> ContextSource {
    ContextSource::new("codebase", SourceType::CodeAnalysis, weight).unwrap()
}

// ── Construction ──────────────────────────────────────────────────────────

#[test]
fn new_source_starts_active_with_full_weight() {
    let source = make_test_source(4.0);
    assert_eq!(source.status(), SourceStatus::Active);
    assert_eq!(source.effective_weight(), 4.0);
    assert_eq!(source.consecutive_failures(), 0);
}

#[test]
fn weight_outside_range_is_rejected() {
    assert!(matches!(
        ContextSource::new("x", SourceType::Memory, 10.5),
        Err(SourceError::InvalidWeight { .. })
    ));
    assert!(ContextSource::new("x", SourceType::Memory, -0.1).is_err());
    assert!(ContextSource::new("x", SourceType::Memory, 10.0).is_ok());

    let mut source = make_test_source(1.0);
    assert!(source.set_weight(11.0).is_err());
    assert_eq!(source.weight(), 1.0);
}

// ── State machine ─────────────────────────────────────────────────────────

#[test]
fn three_consecutive_failures_mark_failing_and_halve_weight() {
    let mut source = make_test_source(6.0);
    source.record_failure("timeout", 120.0);
    source.record_failure("timeout", 120.0);
    assert_eq!(source.status(), SourceStatus::Active);

    source.record_failure("timeout", 120.0);
    assert_eq!(source.status(), SourceStatus::Failing);
    assert_eq!(source.effective_weight(), 3.0);
    assert!(source.is_usable());
}

#[test]
fn success_resets_failures_and_recovers() {
    let mut source = make_test_source(2.0);
    for _ in 0..4 {
        source.record_failure("boom", 10.0);
    }
    assert_eq!(source.status(), SourceStatus::Failing);

    source.record_success(20.0, 5);
    assert_eq!(source.status(), SourceStatus::Active);
    assert_eq!(source.consecutive_failures(), 0);
    assert_eq!(source.effective_weight(), 2.0);
}

#[test]
fn intermittent_success_prevents_failing() {
    let mut source = make_test_source(2.0);
    source.record_failure("a", 1.0);
    source.record_failure("b", 1.0);
    source.record_success(1.0, 1);
    source.record_failure("c", 1.0);
    source.record_failure("d", 1.0);
    assert_eq!(source.status(), SourceStatus::Active);
}

#[test]
fn administrative_states_zero_weight_and_are_sticky() {
    let mut source = make_test_source(5.0);
    source.disable();
    assert_eq!(source.effective_weight(), 0.0);
    source.record_success(1.0, 1);
    assert_eq!(source.status(), SourceStatus::Disabled);
    for _ in 0..5 {
        source.record_failure("x", 1.0);
    }
    assert_eq!(source.status(), SourceStatus::Disabled);

    source.deactivate();
    assert_eq!(source.status(), SourceStatus::Inactive);
    assert!(!source.is_usable());

    source.enable();
    assert_eq!(source.status(), SourceStatus::Active);
    assert_eq!(source.consecutive_failures(), 0);
    assert_eq!(source.effective_weight(), 5.0);
}

#[test]
fn reset_clears_metrics() {
    let mut source = make_test_source(1.0);
    source.record_failure("x", 1.0);
    source.disable();
    source.reset();
    assert_eq!(source.status(), SourceStatus::Active);
    assert_eq!(source.metrics, SourceMetrics::default());
    assert!(source.last_fetch_at.is_none());
}

// ── Metrics ───────────────────────────────────────────────────────────────

#[test]
fn metrics_track_running_average_latency() {
    let mut source = make_test_source(1.0);
    source.record_success(100.0, 3);
    source.record_success(200.0, 2);
    source.record_failure("refused", 300.0);

    let m = &source.metrics;
    assert_eq!(m.fetch_count, 3);
    assert_eq!(m.success_count, 2);
    assert_eq!(m.failure_count, 1);
    assert_eq!(m.entries_delivered, 5);
    assert!((m.avg_latency_ms - 200.0).abs() < 1e-9);
    assert_eq!(m.last_error.as_deref(), Some("refused"));
    assert!(source.last_fetch_at.is_some());
}

// ── Hooks ─────────────────────────────────────────────────────────────────

#[test]
fn hooks_filter_then_transform() {
    let source = make_test_source(1.0)
        .with_validator(Arc::new(|e: &ContextEntry| e.relevance_score() >= 0.5))
        .with_transformer(Arc::new(|e: ContextEntry| e.with_metadata("tagged", true.into())));

    let entries = vec![
        ContextEntry::new("codebase", "keep", 0.9),
        ContextEntry::new("codebase", "drop", 0.1),
    ];
    let out = source.apply_hooks(entries);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].render(), "keep");
    assert_eq!(out[0].metadata["tagged"], true);
}

#[test]
fn hooks_absent_pass_entries_through() {
    let source = make_test_source(1.0);
    let out = source.apply_hooks(vec![ContextEntry::new("codebase", "x", 0.1)]);
    assert_eq!(out.len(), 1);
}

#[test]
fn source_serializes_without_hooks() {
    let source = make_test_source(1.0).with_validator(Arc::new(|_: &ContextEntry| true));
    let json = serde_json::to_string(&source).unwrap();
    let back: ContextSource = serde_json::from_str(&json).unwrap();
    assert_eq!(back.name, "codebase");
    assert_eq!(back.source_type, SourceType::CodeAnalysis);
    assert!(json.contains("\"code_analysis\""));
}
