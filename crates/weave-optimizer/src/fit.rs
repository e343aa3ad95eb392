//! Fit-to-limit: the three budget tiers.
//!
//! ```text
//! total ≤ budget            → unchanged
//! total ≤ factor × budget   → relevance floor, greedy in order
//! otherwise (aggressive)    → relevance × recency order, greedy
//!                             └ nothing kept → summarize, high-relevance floor, greedy
//! nothing fits on its own   → most relevant single candidate, unsummarized
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weave_core::config::OptimizerConfig;
use weave_core::ContextEntry;
use weave_tokens::budget::allocate_sizes;

use crate::summarize::summarize_entries;
use crate::total_tokens;

/// Which tier produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitTier {
    WithinBudget,
    Moderate,
    Aggressive,
    Summarized,
    /// Nothing fit on its own; a single oversized entry was returned.
    OversizedFallback,
}

/// Recency multiplier by entry age.
pub fn recency_factor(entry: &ContextEntry, now: DateTime<Utc>) -> f64 {
    let minutes = entry.age(now).num_minutes();
    match minutes {
        m if m < 5 => 1.0,
        m if m < 30 => 0.9,
        m if m < 60 => 0.7,
        m if m < 1_440 => 0.5,
        _ => 0.3,
    }
}

/// Fit entries under `max_tokens` by whole-entry removal.
pub fn fit_to_limit(
    entries: Vec<ContextEntry>,
    max_tokens: usize,
    config: &OptimizerConfig,
    now: DateTime<Utc>,
) -> (Vec<ContextEntry>, FitTier) {
    let total = total_tokens(&entries);
    if total <= max_tokens {
        return (entries, FitTier::WithinBudget);
    }

    if (total as f64) <= (max_tokens as f64) * config.aggressive_factor {
        let candidates: Vec<ContextEntry> = entries
            .into_iter()
            .filter(|e| e.relevance_score() >= config.min_relevance_score)
            .collect();
        let kept = greedy_keep(&candidates, max_tokens);
        if !kept.is_empty() || candidates.is_empty() {
            return (kept, FitTier::Moderate);
        }
        return (oversized_fallback(candidates), FitTier::OversizedFallback);
    }

    let mut ranked: Vec<(f64, ContextEntry)> = entries
        .into_iter()
        .map(|e| (e.relevance_score() * recency_factor(&e, now), e))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    let ranked: Vec<ContextEntry> = ranked.into_iter().map(|(_, e)| e).collect();

    let kept = greedy_keep(&ranked, max_tokens);
    if !kept.is_empty() {
        return (kept, FitTier::Aggressive);
    }

    tracing::debug!(max_tokens, "greedy pass kept nothing, summarizing");
    let summarized = summarize_entries(ranked.clone(), config.summary_ratio);
    let floor: Vec<ContextEntry> = summarized
        .iter()
        .filter(|e| e.relevance_score() >= config.aggressive_relevance_floor)
        .cloned()
        .collect();
    let kept = greedy_keep(&floor, max_tokens);
    if !kept.is_empty() {
        return (kept, FitTier::Summarized);
    }

    (oversized_fallback(ranked), FitTier::OversizedFallback)
}

/// Keep entries in order while the running total stays within budget.
/// An entry that would overflow is skipped whole.
fn greedy_keep(entries: &[ContextEntry], max_tokens: usize) -> Vec<ContextEntry> {
    let sizes: Vec<usize> = entries.iter().map(|e| e.token_count).collect();
    allocate_sizes(&sizes, max_tokens)
        .into_iter()
        .map(|a| entries[a.index].clone())
        .collect()
}

/// The most relevant single entry, first wins on ties.
fn oversized_fallback(entries: Vec<ContextEntry>) -> Vec<ContextEntry> {
    let mut best: Option<ContextEntry> = None;
    for entry in entries {
        let better = best
            .as_ref()
            .map_or(true, |b| entry.relevance_score() > b.relevance_score());
        if better {
            best = Some(entry);
        }
    }
    best.into_iter().collect()
}
