use serde::{Deserialize, Serialize};

use super::defaults;

/// Adaptive strategy selector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Step size of the online feature-weight update.
    pub learning_rate: f64,
    /// Aspiration level feedback scores are compared against.
    pub target_score: f64,
    /// Weight of a strategy's self-reported quality estimate.
    pub base_weight: f64,
    /// Weight of the learned feature/affinity score.
    pub feature_weight: f64,
    /// Weight of the historical average for the feature signature.
    pub historical_weight: f64,
    /// Learned weight every feature starts from.
    pub initial_feature_weight: f64,
    /// Historical score used when a signature has no history.
    pub neutral_score: f64,
    /// Score gap above which a selection is high confidence.
    pub high_confidence_gap: f64,
    /// Score gap above which a selection is medium confidence.
    pub medium_confidence_gap: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            target_score: defaults::DEFAULT_TARGET_SCORE,
            base_weight: defaults::DEFAULT_BASE_SCORE_WEIGHT,
            feature_weight: defaults::DEFAULT_FEATURE_SCORE_WEIGHT,
            historical_weight: defaults::DEFAULT_HISTORICAL_SCORE_WEIGHT,
            initial_feature_weight: defaults::DEFAULT_INITIAL_FEATURE_WEIGHT,
            neutral_score: defaults::DEFAULT_NEUTRAL_SCORE,
            high_confidence_gap: defaults::DEFAULT_HIGH_CONFIDENCE_GAP,
            medium_confidence_gap: defaults::DEFAULT_MEDIUM_CONFIDENCE_GAP,
        }
    }
}
