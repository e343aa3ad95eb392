//! Span definitions per operation: build, optimize, selection, feedback, cache sweep.

/// Create a context build span.
#[macro_export]
macro_rules! build_span {
    ($strategy:expr, $max_tokens:expr) => {
        tracing::info_span!("weave.build", strategy = %$strategy, max_tokens = $max_tokens)
    };
}

/// Create an optimization span.
#[macro_export]
macro_rules! optimize_span {
    ($entry_count:expr, $max_tokens:expr) => {
        tracing::info_span!("weave.optimize", entries = $entry_count, max_tokens = $max_tokens)
    };
}

/// Create a strategy selection span.
#[macro_export]
macro_rules! selection_span {
    ($candidates:expr) => {
        tracing::info_span!("weave.selection", candidates = $candidates)
    };
}

/// Create a feedback span.
#[macro_export]
macro_rules! feedback_span {
    ($strategy:expr, $score:expr) => {
        tracing::info_span!("weave.feedback", strategy = %$strategy, score = $score)
    };
}

/// Create a cache sweep span.
#[macro_export]
macro_rules! cache_sweep_span {
    () => {
        tracing::debug_span!("weave.cache_sweep")
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const BUILD: &str = "weave.build";
    pub const OPTIMIZE: &str = "weave.optimize";
    pub const SELECTION: &str = "weave.selection";
    pub const FEEDBACK: &str = "weave.feedback";
    pub const CACHE_SWEEP: &str = "weave.cache_sweep";
}
