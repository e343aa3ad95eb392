use proptest::prelude::*;
use weave_tokens::budget::allocate_sizes;
use weave_tokens::TokenCounter;

proptest! {
    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::default();
        prop_assert_eq!(counter.count(&s), counter.count_cached(&s));
    }

    #[test]
    fn subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let counter = TokenCounter::default();
        let combined = format!("{}{}", a, b);
        prop_assert!(counter.count(&combined) <= counter.count(&a) + counter.count(&b) + 1);
    }

    #[test]
    fn allocation_never_exceeds_budget(
        sizes in proptest::collection::vec(0usize..500, 0..30),
        budget in 0usize..2000
    ) {
        let total: usize = allocate_sizes(&sizes, budget).iter().map(|a| a.tokens).sum();
        prop_assert!(total <= budget);
    }
}
