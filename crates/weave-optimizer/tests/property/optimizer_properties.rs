use chrono::Utc;
use proptest::prelude::*;
use weave_core::config::OptimizerConfig;
use weave_core::ContextEntry;
use weave_optimizer::dedup::deduplicate;
use weave_optimizer::{total_tokens, ContextOptimizer};

fn arb_entry() -> impl Strategy<Value = ContextEntry> {
    (
        prop::sample::select(vec!["docs", "code", "chat"]),
        "[a-e]{1,3}( [a-e]{1,3}){0,5}",
        1usize..400,
        0.0f64..=1.0,
    )
        .prop_map(|(source, text, tokens, relevance)| {
            ContextEntry::new(source, text.as_str(), relevance).with_token_count(tokens)
        })
}

proptest! {
    #[test]
    fn within_budget_is_a_no_op(entries in prop::collection::vec(arb_entry(), 0..20), slack in 0usize..500) {
        let max_tokens = total_tokens(&entries) + slack;
        let out = ContextOptimizer::default().optimize(entries.clone(), max_tokens);
        prop_assert_eq!(out, entries);
    }

    #[test]
    fn dedup_is_idempotent(entries in prop::collection::vec(arb_entry(), 0..25)) {
        let threshold = OptimizerConfig::default().similarity_threshold;
        let once = deduplicate(entries, threshold);
        let twice = deduplicate(once.clone(), threshold);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn result_fits_or_is_a_single_entry(
        entries in prop::collection::vec(arb_entry(), 1..20),
        max_tokens in 1usize..800,
    ) {
        let out = ContextOptimizer::default().optimize_at(entries, max_tokens, Utc::now());
        prop_assert!(total_tokens(&out) <= max_tokens || out.len() == 1);
    }
}
