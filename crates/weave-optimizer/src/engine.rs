//! ContextOptimizer — runs the full pipeline with a fixed configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weave_core::config::OptimizerConfig;
use weave_core::ContextEntry;

use crate::compress::compress_entries;
use crate::dedup::deduplicate;
use crate::expire::remove_expired;
use crate::fit::{fit_to_limit, FitTier};
use crate::merge::merge_related;
use crate::savings::{estimate_savings, SavingsEstimate};
use crate::streaming::chunk_for_streaming;
use crate::total_tokens;

/// What one optimization pass did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub tier: FitTier,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub input_count: usize,
    pub output_count: usize,
    pub expired_removed: usize,
    pub duplicates_removed: usize,
    pub compressed: usize,
    pub dropped_by_fit: usize,
}

impl OptimizationReport {
    fn unchanged(entries: &[ContextEntry]) -> Self {
        let tokens = total_tokens(entries);
        Self {
            tier: FitTier::WithinBudget,
            input_tokens: tokens,
            output_tokens: tokens,
            input_count: entries.len(),
            output_count: entries.len(),
            expired_removed: 0,
            duplicates_removed: 0,
            compressed: 0,
            dropped_by_fit: 0,
        }
    }

    pub fn tokens_saved(&self) -> usize {
        self.input_tokens.saturating_sub(self.output_tokens)
    }
}

/// Stateless budget fitter. Cheap to clone and safe to share.
#[derive(Debug, Clone, Default)]
pub struct ContextOptimizer {
    config: OptimizerConfig,
}

impl ContextOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn optimize(&self, entries: Vec<ContextEntry>, max_tokens: usize) -> Vec<ContextEntry> {
        self.optimize_at(entries, max_tokens, Utc::now())
    }

    pub fn optimize_at(
        &self,
        entries: Vec<ContextEntry>,
        max_tokens: usize,
        now: DateTime<Utc>,
    ) -> Vec<ContextEntry> {
        self.optimize_with_report(entries, max_tokens, now).0
    }

    /// Run expire → deduplicate → compress → fit, reporting each stage.
    ///
    /// Input already within budget is returned untouched.
    pub fn optimize_with_report(
        &self,
        entries: Vec<ContextEntry>,
        max_tokens: usize,
        now: DateTime<Utc>,
    ) -> (Vec<ContextEntry>, OptimizationReport) {
        let input_tokens = total_tokens(&entries);
        if input_tokens <= max_tokens {
            let report = OptimizationReport::unchanged(&entries);
            return (entries, report);
        }

        let input_count = entries.len();

        let entries = remove_expired(entries, now);
        let expired_removed = input_count - entries.len();

        let before_dedup = entries.len();
        let entries = deduplicate(entries, self.config.similarity_threshold);
        let duplicates_removed = before_dedup - entries.len();

        let already_compressed = entries.iter().filter(|e| e.compressed).count();
        let entries = compress_entries(entries, self.config.compression_threshold);
        let compressed = entries.iter().filter(|e| e.compressed).count() - already_compressed;

        let before_fit = entries.len();
        let (entries, tier) = fit_to_limit(entries, max_tokens, &self.config, now);

        let report = OptimizationReport {
            tier,
            input_tokens,
            output_tokens: total_tokens(&entries),
            input_count,
            output_count: entries.len(),
            expired_removed,
            duplicates_removed,
            compressed,
            dropped_by_fit: before_fit.saturating_sub(entries.len()),
        };

        tracing::debug!(
            tier = ?report.tier,
            input_tokens = report.input_tokens,
            output_tokens = report.output_tokens,
            max_tokens,
            expired = report.expired_removed,
            duplicates = report.duplicates_removed,
            compressed = report.compressed,
            dropped = report.dropped_by_fit,
            "optimized context"
        );

        (entries, report)
    }

    pub fn merge_related(&self, entries: Vec<ContextEntry>) -> Vec<ContextEntry> {
        merge_related(
            entries,
            self.config.merge_threshold,
            self.config.merge_reduction,
        )
    }

    pub fn chunk_for_streaming(
        &self,
        entries: Vec<ContextEntry>,
        chunk_tokens: usize,
    ) -> Vec<Vec<ContextEntry>> {
        chunk_for_streaming(entries, chunk_tokens)
    }

    pub fn estimate_savings(
        &self,
        entries: &[ContextEntry],
        max_tokens: usize,
        now: DateTime<Utc>,
    ) -> SavingsEstimate {
        estimate_savings(entries, max_tokens, &self.config, now)
    }
}
