//! Non-mutating estimate of what each optimizer stage would save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weave_core::config::OptimizerConfig;
use weave_core::ContextEntry;

use crate::compress::compress_content;
use crate::similarity::jaccard;
use crate::total_tokens;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub expired_tokens: usize,
    pub duplicate_tokens: usize,
    pub compressible_tokens: usize,
    /// Tokens still above budget after the other stages.
    pub over_budget_tokens: usize,
}

impl SavingsEstimate {
    pub fn total(&self) -> usize {
        self.expired_tokens + self.duplicate_tokens + self.compressible_tokens + self.over_budget_tokens
    }
}

pub fn estimate_savings(
    entries: &[ContextEntry],
    max_tokens: usize,
    config: &OptimizerConfig,
    now: DateTime<Utc>,
) -> SavingsEstimate {
    let (expired, live): (Vec<&ContextEntry>, Vec<&ContextEntry>) =
        entries.iter().partition(|e| e.is_expired_at(now));
    let expired_tokens = expired.iter().map(|e| e.token_count).sum();

    let mut kept: Vec<&ContextEntry> = Vec::with_capacity(live.len());
    let mut duplicate_tokens = 0;
    for entry in live {
        if kept
            .iter()
            .any(|k| jaccard(k, entry) >= config.similarity_threshold)
        {
            duplicate_tokens += entry.token_count;
        } else {
            kept.push(entry);
        }
    }

    let compressible_tokens = kept
        .iter()
        .filter(|e| e.token_count > config.compression_threshold && !e.compressed)
        .map(|e| {
            e.token_count
                .saturating_sub(compress_content(&e.content).estimate_tokens())
        })
        .sum::<usize>();

    let remaining = kept.iter().map(|e| e.token_count).sum::<usize>() - compressible_tokens;

    SavingsEstimate {
        expired_tokens,
        duplicate_tokens,
        compressible_tokens,
        over_budget_tokens: remaining.saturating_sub(max_tokens),
    }
}
