//! # weave-optimizer
//!
//! Fits a list of context entries under a hard token ceiling.
//!
//! Pipeline: expire → deduplicate → compress → fit-to-limit. Fitting has
//! three tiers keyed on how far over budget the input is; the last one
//! summarizes before truncating. Every function here is pure and never fails.

pub mod compress;
pub mod dedup;
pub mod engine;
pub mod expire;
pub mod fit;
pub mod merge;
pub mod savings;
pub mod similarity;
pub mod streaming;
pub mod summarize;

pub use engine::{ContextOptimizer, OptimizationReport};
pub use fit::{fit_to_limit, recency_factor, FitTier};
pub use savings::{estimate_savings, SavingsEstimate};
pub use streaming::chunk_for_streaming;

/// Sum of entry token counts.
pub fn total_tokens(entries: &[weave_core::ContextEntry]) -> usize {
    entries.iter().map(|e| e.token_count).sum()
}
