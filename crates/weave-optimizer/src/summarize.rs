//! Extractive summarization used by the aggressive fitting tier.

use weave_core::models::EntryContent;
use weave_core::ContextEntry;

/// Split after `.`, `!` or `?` when followed by whitespace or end of text.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            if at_boundary {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Keep leading sentences until roughly `ratio` of the words are covered.
///
/// A single leading sentence longer than the target is cut at the word
/// level. Returns the input unchanged when no reduction is possible.
pub fn summarize_text(text: &str, ratio: f64) -> String {
    let total_words = text.split_whitespace().count();
    if total_words == 0 {
        return text.to_string();
    }
    let target = ((total_words as f64) * ratio).ceil().max(1.0) as usize;

    let mut kept: Vec<&str> = Vec::new();
    let mut kept_words = 0;
    for sentence in split_sentences(text) {
        if kept_words >= target {
            break;
        }
        kept_words += sentence.split_whitespace().count();
        kept.push(sentence);
    }

    let summary = if kept.len() == 1 && kept_words > target {
        kept[0]
            .split_whitespace()
            .take(target)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        kept.join(" ")
    };

    if summary.split_whitespace().count() >= total_words {
        text.to_string()
    } else {
        summary
    }
}

/// Summarize one entry in place. Already summarized entries are left alone.
pub fn summarize_entry(entry: &mut ContextEntry, ratio: f64) {
    if entry.summarized {
        return;
    }
    let text = entry.render();
    let summary = summarize_text(&text, ratio);
    if summary != text {
        entry.apply_summary(EntryContent::Text(summary));
    }
}

pub fn summarize_entries(entries: Vec<ContextEntry>, ratio: f64) -> Vec<ContextEntry> {
    entries
        .into_iter()
        .map(|mut entry| {
            summarize_entry(&mut entry, ratio);
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation_only_at_boundaries() {
        assert_eq!(
            split_sentences("Use v1.2 now. Really! Why? tail"),
            vec!["Use v1.2 now.", "Really!", "Why?", "tail"]
        );
    }

    #[test]
    fn keeps_leading_sentences() {
        let text = "One two three. Four five six. Seven eight nine. Ten eleven twelve.";
        // 12 words × 0.3 → 4 words → first two sentences
        assert_eq!(summarize_text(text, 0.3), "One two three. Four five six.");
    }

    #[test]
    fn long_single_sentence_is_cut_by_words() {
        let text = "a b c d e f g h i j";
        assert_eq!(summarize_text(text, 0.3), "a b c");
    }

    #[test]
    fn no_gain_returns_input() {
        assert_eq!(summarize_text("short", 0.3), "short");
    }

    #[test]
    fn summarize_entry_marks_and_backs_up() {
        let mut entry = ContextEntry::new("s", "First part here. Second part here. Third part.", 0.9);
        summarize_entry(&mut entry, 0.3);
        assert!(entry.summarized);
        assert_eq!(entry.render(), "First part here.");
        assert!(entry.original_content.is_some());
    }
}
