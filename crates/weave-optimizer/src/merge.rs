//! Merging related entries within a source.

use weave_core::ContextEntry;

use crate::similarity::jaccard;

/// Merge entries of the same source whose similarity reaches `threshold`.
///
/// Sources keep their first-seen order. A merged entry's token count is the
/// sum of its inputs reduced by `reduction`.
pub fn merge_related(
    entries: Vec<ContextEntry>,
    threshold: f64,
    reduction: f64,
) -> Vec<ContextEntry> {
    let mut groups: Vec<(String, Vec<ContextEntry>)> = Vec::new();

    for entry in entries {
        let idx = match groups.iter().position(|(source, _)| *source == entry.source) {
            Some(idx) => idx,
            None => {
                groups.push((entry.source.clone(), Vec::new()));
                groups.len() - 1
            }
        };
        let members = &mut groups[idx].1;

        let similar = members
            .iter()
            .position(|m| jaccard(m, &entry) >= threshold);
        match similar {
            Some(pos) => match members[pos].merge(&entry) {
                Ok(merged) => {
                    let combined = members[pos].token_count + entry.token_count;
                    let estimate = ((combined as f64) * (1.0 - reduction)).round() as usize;
                    members[pos] = merged.with_token_count(estimate);
                }
                Err(_) => members.push(entry),
            },
            None => members.push(entry),
        }
    }

    groups.into_iter().flat_map(|(_, members)| members).collect()
}
