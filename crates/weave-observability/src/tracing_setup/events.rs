//! Structured log events for key pipeline decisions.

pub fn cache_hit(key: &str) {
    tracing::debug!(event = "cache_hit", key = %key, "served context from cache");
}

pub fn cache_invalidated(scope: &str, removed: usize) {
    tracing::info!(
        event = "cache_invalidated",
        scope = %scope,
        removed = removed,
        "cache invalidated"
    );
}

pub fn cache_swept(removed: usize, remaining: usize) {
    tracing::debug!(
        event = "cache_swept",
        removed = removed,
        remaining = remaining,
        "expired cache entries swept"
    );
}

/// Log the outcome of automatic strategy selection.
pub fn strategy_selected(strategy: &str, score: f64, confidence: &str) {
    tracing::info!(
        event = "strategy_selected",
        strategy = %strategy,
        score = score,
        confidence = %confidence,
        "strategy selected"
    );
}

pub fn feedback_recorded(strategy: &str, score: f64, new_average: f64, samples: u64) {
    tracing::info!(
        event = "feedback_recorded",
        strategy = %strategy,
        score = score,
        new_average = new_average,
        samples = samples,
        "feedback recorded"
    );
}

pub fn context_built(strategy: &str, entries: usize, tokens: usize, max_tokens: usize) {
    tracing::info!(
        event = "context_built",
        strategy = %strategy,
        entries = entries,
        tokens = tokens,
        max_tokens = max_tokens,
        "context built"
    );
}

/// Log a strategy failure that is being returned to the caller.
pub fn strategy_failed(strategy: &str, error: &str) {
    tracing::warn!(
        event = "strategy_failed",
        strategy = %strategy,
        error = %error,
        "strategy build failed"
    );
}
