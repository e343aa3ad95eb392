//! Lossless-ish size reduction for oversized entries.
//!
//! Text: collapse whitespace and strip stop words.
//! Structured: strip null and empty values recursively.

use serde_json::Value;
use weave_core::models::EntryContent;
use weave_core::ContextEntry;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "has", "have",
    "in", "into", "is", "it", "its", "of", "on", "or", "so", "that", "the", "their", "then",
    "there", "these", "this", "those", "to", "was", "were", "will", "with",
];

fn is_stop_word(word: &str) -> bool {
    let lowered = word.to_ascii_lowercase();
    STOP_WORDS.binary_search(&lowered.as_str()).is_ok()
}

/// Compress every entry above `threshold` tokens that is not already compressed.
pub fn compress_entries(entries: Vec<ContextEntry>, threshold: usize) -> Vec<ContextEntry> {
    entries
        .into_iter()
        .map(|mut entry| {
            if entry.token_count > threshold && !entry.compressed {
                let compressed = compress_content(&entry.content);
                entry.apply_compression(compressed);
            }
            entry
        })
        .collect()
}

pub fn compress_content(content: &EntryContent) -> EntryContent {
    match content {
        EntryContent::Text(text) => EntryContent::Text(compress_text(text)),
        EntryContent::Structured(value) => {
            EntryContent::Structured(strip_empty(value.clone()).unwrap_or(Value::Null))
        }
    }
}

/// Whitespace normalization plus stop-word removal. Falls back to the
/// normalized text when every word is a stop word.
pub fn compress_text(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let kept: Vec<&str> = words.iter().copied().filter(|w| !is_stop_word(w)).collect();
    if kept.is_empty() {
        words.join(" ")
    } else {
        kept.join(" ")
    }
}

/// Remove nulls, empty strings, empty arrays and empty objects. Returns
/// `None` when the value itself is empty.
fn strip_empty(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(strip_empty).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(map) => {
            let map: serde_json::Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| strip_empty(v).map(|v| (k, v)))
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stop_words_are_sorted_for_binary_search() {
        assert!(STOP_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn text_compression_strips_stop_words_and_whitespace() {
        assert_eq!(
            compress_text("The  parser\n\tturns the input into an AST"),
            "parser turns input AST"
        );
    }

    #[test]
    fn all_stop_words_keeps_normalized_text() {
        assert_eq!(compress_text("  the   of "), "the of");
    }

    #[test]
    fn structured_compression_strips_empty_values() {
        let value = json!({
            "name": "parse",
            "doc": "",
            "args": [],
            "meta": {"deprecated": null},
            "calls": ["lex", null],
        });
        assert_eq!(
            compress_content(&EntryContent::Structured(value)),
            EntryContent::Structured(json!({"name": "parse", "calls": ["lex"]}))
        );
    }

    #[test]
    fn only_oversized_uncompressed_entries_are_touched() {
        let small = ContextEntry::new("s", "the small one", 0.5).with_token_count(10);
        let big = ContextEntry::new("s", "the big one", 0.5).with_token_count(2_000);
        let out = compress_entries(vec![small, big], 1_000);
        assert!(!out[0].compressed);
        assert!(out[1].compressed);
        assert_eq!(out[1].render(), "big one");
        assert_eq!(
            out[1].original_content,
            Some(EntryContent::Text("the big one".into()))
        );

        let again = compress_entries(out.clone(), 0);
        assert_eq!(again[1].original_content, out[1].original_content);
        assert_eq!(again[1].render(), "big one");
    }
}
