//! Token-set Jaccard similarity between entries.

use std::collections::HashSet;

use weave_core::ContextEntry;

/// Jaccard index over whitespace-split tokens. Identical content is 1.0.
pub fn jaccard(a: &ContextEntry, b: &ContextEntry) -> f64 {
    if a.content_hash == b.content_hash {
        return 1.0;
    }
    jaccard_text(&a.content.as_text(), &b.content.as_text())
}

pub fn jaccard_text(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_is_one() {
        let a = ContextEntry::new("s", "same text here", 0.5);
        let b = ContextEntry::new("t", "same text here", 0.1);
        assert_eq!(jaccard(&a, &b), 1.0);
    }

    #[test]
    fn partial_overlap() {
        // {a b c} vs {b c d}: 2 / 4
        assert!((jaccard_text("a b c", "b c d") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn disjoint_is_zero() {
        assert_eq!(jaccard_text("alpha", "beta"), 0.0);
    }

    #[test]
    fn whitespace_layout_does_not_matter() {
        assert_eq!(jaccard_text("a  b\nc", "c b a"), 1.0);
    }
}
