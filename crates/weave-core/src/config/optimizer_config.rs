use serde::{Deserialize, Serialize};

use super::defaults;

/// Budget-fitting optimizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Jaccard similarity at or above which an entry counts as a duplicate.
    pub similarity_threshold: f64,
    /// Looser similarity used when merging related entries of one source.
    pub merge_threshold: f64,
    /// Entries above this many tokens get compressed.
    pub compression_threshold: usize,
    /// Relevance floor applied in the moderate fitting tier.
    pub min_relevance_score: f64,
    /// Target size of a summary relative to the original.
    pub summary_ratio: f64,
    /// Relevance floor applied after summarizing in the aggressive tier.
    pub aggressive_relevance_floor: f64,
    /// Over-budget factor beyond which the aggressive tier runs.
    pub aggressive_factor: f64,
    /// Estimated fraction of tokens saved by merging related entries.
    pub merge_reduction: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            merge_threshold: defaults::DEFAULT_MERGE_THRESHOLD,
            compression_threshold: defaults::DEFAULT_COMPRESSION_THRESHOLD,
            min_relevance_score: defaults::DEFAULT_MIN_RELEVANCE_SCORE,
            summary_ratio: defaults::DEFAULT_SUMMARY_RATIO,
            aggressive_relevance_floor: defaults::DEFAULT_AGGRESSIVE_RELEVANCE_FLOOR,
            aggressive_factor: defaults::DEFAULT_AGGRESSIVE_FACTOR,
            merge_reduction: defaults::DEFAULT_MERGE_REDUCTION,
        }
    }
}
