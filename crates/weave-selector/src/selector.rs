//! AdaptiveSelector — strategy scoring, selection, and online learning.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use weave_core::config::SelectorConfig;
use weave_core::models::{FeatureAffinity, FeatureName, FeatureSignature, QueryFeatures};
use weave_core::{BuildOptions, IContextStrategy, StrategyKind};
use weave_observability::tracing_setup::events;

use crate::extract::extract_features;

/// How clearly the winner beat the runner-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score breakdown for one candidate strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyScore {
    pub strategy: StrategyKind,
    pub base: f64,
    pub feature: f64,
    pub historical: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub strategy: StrategyKind,
    pub score: f64,
    pub confidence: Confidence,
}

/// Accumulated feedback for one (signature, strategy) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub total_score: f64,
    pub count: u64,
    pub average_score: f64,
}

impl PerformanceRecord {
    fn record(&mut self, score: f64) {
        self.total_score += score;
        self.count += 1;
        self.average_score = self.total_score / self.count as f64;
    }
}

struct SelectorState {
    history: HashMap<(FeatureSignature, StrategyKind), PerformanceRecord>,
    weights: HashMap<FeatureName, f64>,
}

impl SelectorState {
    fn new(initial_weight: f64) -> Self {
        Self {
            history: HashMap::new(),
            weights: FeatureName::ALL
                .iter()
                .map(|&name| (name, initial_weight))
                .collect(),
        }
    }
}

/// Learns online which strategy suits which query shape.
///
/// All state sits behind one mutex, so selections and feedback are
/// serialized against each other. Nothing here returns an error; a poisoned
/// lock is recovered since every update leaves the state consistent.
pub struct AdaptiveSelector {
    config: SelectorConfig,
    state: Mutex<SelectorState>,
}

impl AdaptiveSelector {
    pub fn new(config: SelectorConfig) -> Self {
        let state = Mutex::new(SelectorState::new(config.initial_feature_weight));
        Self { config, state }
    }

    fn lock(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Score every candidate, in the order given.
    ///
    /// Quality estimates are gathered before the state lock is taken.
    pub fn score_strategies(
        &self,
        query: &str,
        options: &BuildOptions,
        strategies: &[Arc<dyn IContextStrategy>],
    ) -> Vec<StrategyScore> {
        let features = extract_features(query, options);
        let candidates: Vec<(StrategyKind, f64, FeatureAffinity)> = strategies
            .iter()
            .map(|s| {
                let estimate = s.estimate_quality(query, options);
                let base = if estimate.is_finite() {
                    estimate.clamp(0.0, 1.0)
                } else {
                    self.config.neutral_score
                };
                (s.kind(), base, s.affinity())
            })
            .collect();

        let state = self.lock();
        candidates
            .iter()
            .map(|(kind, base, affinity)| self.score_one(*kind, *base, affinity, &features, &state))
            .collect()
    }

    fn score_one(
        &self,
        kind: StrategyKind,
        base: f64,
        affinity: &FeatureAffinity,
        features: &QueryFeatures,
        state: &SelectorState,
    ) -> StrategyScore {
        let feature = features
            .active()
            .into_iter()
            .map(|f| {
                let weight = state
                    .weights
                    .get(&f.name())
                    .copied()
                    .unwrap_or(self.config.initial_feature_weight);
                weight * affinity.get(f)
            })
            .sum::<f64>();

        let historical = state
            .history
            .get(&(features.signature(), kind))
            .map_or(self.config.neutral_score, |r| r.average_score);

        let total = self.config.base_weight * base
            + self.config.feature_weight * feature
            + self.config.historical_weight * historical;

        StrategyScore {
            strategy: kind,
            base,
            feature,
            historical,
            total,
        }
    }

    /// Pick the highest-scoring strategy. Ties go to the earliest candidate.
    ///
    /// Returns `None` only when there are no candidates.
    pub fn select_strategy(
        &self,
        query: &str,
        options: &BuildOptions,
        strategies: &[Arc<dyn IContextStrategy>],
    ) -> Option<Selection> {
        let _span = weave_observability::selection_span!(strategies.len()).entered();
        let scores = self.score_strategies(query, options, strategies);

        let mut best: Option<StrategyScore> = None;
        let mut runner_up: Option<f64> = None;
        for score in scores {
            match best {
                Some(b) if score.total > b.total => {
                    runner_up = Some(b.total);
                    best = Some(score);
                }
                Some(_) => {
                    runner_up = Some(runner_up.map_or(score.total, |r| r.max(score.total)));
                }
                None => best = Some(score),
            }
        }

        let best = best?;
        let confidence = match runner_up {
            None => Confidence::High,
            Some(second) => self.confidence_for_gap(best.total - second),
        };

        events::strategy_selected(best.strategy.as_str(), best.total, confidence.as_str());
        Some(Selection {
            strategy: best.strategy,
            score: best.total,
            confidence,
        })
    }

    fn confidence_for_gap(&self, gap: f64) -> Confidence {
        if gap > self.config.high_confidence_gap {
            Confidence::High
        } else if gap > self.config.medium_confidence_gap {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Fold an observed quality score into history and learned weights.
    ///
    /// Scores are clamped to [0, 1]; non-finite scores are ignored.
    pub fn record_feedback(
        &self,
        query: &str,
        options: &BuildOptions,
        strategy: StrategyKind,
        score: f64,
    ) {
        if !score.is_finite() {
            tracing::warn!(strategy = %strategy, "ignoring non-finite feedback score");
            return;
        }
        let score = score.clamp(0.0, 1.0);
        let _span = weave_observability::feedback_span!(strategy, score).entered();

        let features = extract_features(query, options);
        let mut state = self.lock();

        let record = state
            .history
            .entry((features.signature(), strategy))
            .or_default();
        record.record(score);
        let (average, count) = (record.average_score, record.count);

        let delta = self.config.learning_rate * (score - self.config.target_score);
        for name in features.true_flags() {
            let weight = state
                .weights
                .entry(name)
                .or_insert(self.config.initial_feature_weight);
            *weight = (*weight + delta).clamp(0.0, 1.0);
        }

        events::feedback_recorded(strategy.as_str(), score, average, count);
    }

    /// Current learned weight for a feature.
    pub fn feature_weight(&self, name: FeatureName) -> f64 {
        self.lock()
            .weights
            .get(&name)
            .copied()
            .unwrap_or(self.config.initial_feature_weight)
    }

    pub fn feature_weights(&self) -> HashMap<FeatureName, f64> {
        self.lock().weights.clone()
    }

    pub fn performance(
        &self,
        signature: FeatureSignature,
        strategy: StrategyKind,
    ) -> Option<PerformanceRecord> {
        self.lock().history.get(&(signature, strategy)).copied()
    }

    /// Forget all history and return weights to their initial value.
    pub fn reset(&self) {
        *self.lock() = SelectorState::new(self.config.initial_feature_weight);
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }
}

impl Default for AdaptiveSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}
