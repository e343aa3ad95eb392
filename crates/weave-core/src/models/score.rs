//! Quality scoring results exchanged with the scorer collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Overall quality in [0.0, 1.0].
    pub overall: f64,
    /// Per-dimension scores, e.g. "coverage", "focus".
    pub dimensions: BTreeMap<String, f64>,
    pub notes: Vec<String>,
}

impl ScoreResult {
    pub fn new(overall: f64) -> Self {
        Self {
            overall: overall.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, score: f64) -> Self {
        self.dimensions.insert(name.into(), score.clamp(0.0, 1.0));
        self
    }

    /// The lowest-scoring dimension, if any.
    pub fn weakest_dimension(&self) -> Option<(&str, f64)> {
        self.dimensions
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, score)| (name.as_str(), *score))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: String,
    pub message: String,
    /// Expected improvement in [0.0, 1.0].
    pub impact: f64,
}
