//! Feature extraction from a query and its build options.

use weave_core::config::defaults::DEFAULT_MAX_TOKENS;
use weave_core::models::{ContextSize, QueryFeatures, QueryLength};
use weave_core::BuildOptions;

/// Keyword sets for the query-intent flags. "implement" counts as both
/// completion and generation.
const COMPLETION_KEYWORDS: &[&str] = &["complete", "finish", "continue", "fill", "implement", "next"];

const GENERATION_KEYWORDS: &[&str] = &[
    "create",
    "generate",
    "build",
    "make",
    "write",
    "develop",
    "design",
    "implement",
];

const ANALYSIS_KEYWORDS: &[&str] = &[
    "analyze",
    "explain",
    "why",
    "how",
    "what",
    "understand",
    "review",
    "debug",
    "investigate",
];

/// Endings accepted after a keyword stem, so "generating" and "debugged"
/// count as their keyword.
const INFLECTIONS: &[&str] = &["", "s", "es", "d", "ed", "ing", "ion", "ions", "ation", "er", "ers"];

/// Extract the fixed feature record. Budget falls back to the default when unset.
pub fn extract_features(query: &str, options: &BuildOptions) -> QueryFeatures {
    let words: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    QueryFeatures {
        query_length: QueryLength::from_chars(query.chars().count()),
        has_code_context: options.file_content.is_some(),
        has_cursor_position: options.cursor_position.is_some(),
        has_multiple_files: options.files.len() > 1,
        has_project_context: options.project_id.is_some(),
        is_completion: mentions(&words, COMPLETION_KEYWORDS),
        is_generation: mentions(&words, GENERATION_KEYWORDS),
        is_analysis: mentions(&words, ANALYSIS_KEYWORDS),
        context_size: ContextSize::from_max_tokens(options.max_tokens_or(DEFAULT_MAX_TOKENS)),
    }
}

fn mentions(words: &[String], keywords: &[&str]) -> bool {
    words
        .iter()
        .any(|w| keywords.iter().any(|k| inflects(w, k)))
}

/// Whether `word` is `keyword` or an inflection of it. A trailing "e" is
/// dropped before suffixes ("create" → "creating") and a doubled final
/// consonant is allowed ("debug" → "debugging").
fn inflects(word: &str, keyword: &str) -> bool {
    let stems = [keyword, keyword.strip_suffix('e').unwrap_or(keyword)];
    stems.iter().any(|stem| {
        let Some(rest) = word.strip_prefix(stem) else {
            return false;
        };
        if INFLECTIONS.contains(&rest) {
            return true;
        }
        match (stem.chars().last(), rest.chars().next()) {
            (Some(last), Some(first)) if last == first => {
                INFLECTIONS.contains(&&rest[first.len_utf8()..])
            }
            _ => false,
        }
    })
}
