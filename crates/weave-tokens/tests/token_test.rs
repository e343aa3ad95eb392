use weave_tokens::{allocate_sizes, TokenCounter};

#[test]
fn count_empty_string_is_zero() {
    let counter = TokenCounter::default();
    assert_eq!(counter.count(""), 0);
}

#[test]
fn count_simple_text() {
    let counter = TokenCounter::default();
    let count = counter.count("hello world");
    assert!(count > 0, "non-empty text should have >0 tokens");
    assert!(count < 10, "hello world should be a few tokens, got {}", count);
}

#[test]
fn count_cached_is_consistent() {
    let counter = TokenCounter::default();
    let text = "consistent counting test";
    let first = counter.count_cached(text);
    let second = counter.count_cached(text);
    assert_eq!(first, second);
    assert_eq!(first, counter.count(text));
}

#[test]
fn shared_estimate_matches_fresh_counter() {
    let counter = TokenCounter::default();
    let text = "The quick brown fox jumps over the lazy dog";
    assert_eq!(weave_tokens::estimate_text(text), counter.count(text));
}

#[test]
fn allocation_over_counted_sizes_respects_budget() {
    let counter = TokenCounter::default();
    let items = ["a ".repeat(500), "b ".repeat(500), "short".to_string()];
    let sizes: Vec<usize> = items.iter().map(|i| counter.count_cached(i)).collect();

    let allocations = allocate_sizes(&sizes, 100);
    let total: usize = allocations.iter().map(|a| a.tokens).sum();
    assert!(total <= 100, "total {} should be <= 100", total);
    assert!(allocations.iter().any(|a| a.index == 2));
}
