use std::sync::Arc;

use proptest::prelude::*;
use weave_core::errors::StrategyError;
use weave_core::models::{FeatureName, QueryType};
use weave_core::{BuildOptions, BuiltContext, IContextStrategy, StrategyKind};
use weave_selector::AdaptiveSelector;

struct FixedStrategy {
    kind: StrategyKind,
    quality: f64,
}

impl IContextStrategy for FixedStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn supported_query_types(&self) -> Vec<QueryType> {
        vec![QueryType::General]
    }

    fn estimate_quality(&self, _query: &str, _options: &BuildOptions) -> f64 {
        self.quality
    }

    fn build(&self, _query: &str, _options: &BuildOptions) -> Result<BuiltContext, StrategyError> {
        Ok(BuiltContext::from_entries(self.kind, Vec::new()))
    }
}

fn arb_kind() -> impl Strategy<Value = StrategyKind> {
    prop::sample::select(StrategyKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn cursor_weight_rises_monotonically_to_one(rounds in 1usize..60) {
        let selector = AdaptiveSelector::default();
        let opts = BuildOptions::new().with_cursor(1, 1);
        let mut previous = selector.feature_weight(FeatureName::HasCursorPosition);
        for _ in 0..rounds {
            selector.record_feedback("finish it", &opts, StrategyKind::Fim, 1.0);
            let current = selector.feature_weight(FeatureName::HasCursorPosition);
            prop_assert!(current >= previous);
            prop_assert!(current <= 1.0);
            previous = current;
        }
        if rounds >= 17 {
            prop_assert_eq!(previous, 1.0);
        }
    }

    #[test]
    fn weights_stay_in_unit_interval(scores in prop::collection::vec(-1.0f64..2.0, 1..40)) {
        let selector = AdaptiveSelector::default();
        let opts = BuildOptions::new().with_cursor(1, 1).with_project("p");
        for score in scores {
            selector.record_feedback("implement why", &opts, StrategyKind::Rag, score);
        }
        for (_, w) in selector.feature_weights() {
            prop_assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn selection_is_the_first_strict_maximum(
        picks in prop::collection::vec((arb_kind(), 0.0f64..=1.0), 1..6),
    ) {
        let selector = AdaptiveSelector::default();
        let opts = BuildOptions::new();
        let candidates: Vec<Arc<dyn IContextStrategy>> = picks
            .iter()
            .map(|&(kind, quality)| Arc::new(FixedStrategy { kind, quality }) as Arc<dyn IContextStrategy>)
            .collect();

        let scores = selector.score_strategies("q", &opts, &candidates);
        let max = scores.iter().map(|s| s.total).fold(f64::MIN, f64::max);
        let first = scores.iter().find(|s| s.total == max).unwrap();

        let selection = selector.select_strategy("q", &opts, &candidates).unwrap();
        prop_assert_eq!(selection.strategy, first.strategy);
        prop_assert_eq!(selection.score, first.total);
    }
}
