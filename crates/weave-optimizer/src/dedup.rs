//! Near-duplicate removal.

use weave_core::ContextEntry;

use crate::similarity::jaccard;

/// Keep an entry only if no previously kept entry is at least `threshold` similar.
///
/// Order is preserved; the first of a similar group wins.
pub fn deduplicate(entries: Vec<ContextEntry>, threshold: f64) -> Vec<ContextEntry> {
    let mut kept: Vec<ContextEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !kept.iter().any(|k| jaccard(k, &entry) >= threshold) {
            kept.push(entry);
        }
    }
    kept
}
