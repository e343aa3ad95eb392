use weave_core::ContextEntry;

/// Pack entries, in order, into chunks of at most `chunk_tokens` tokens.
///
/// An entry larger than a whole chunk gets a chunk to itself.
pub fn chunk_for_streaming(
    entries: Vec<ContextEntry>,
    chunk_tokens: usize,
) -> Vec<Vec<ContextEntry>> {
    let mut chunks = Vec::new();
    let mut current: Vec<ContextEntry> = Vec::new();
    let mut current_tokens = 0;

    for entry in entries {
        if !current.is_empty() && current_tokens + entry.token_count > chunk_tokens {
            chunks.push(std::mem::take(&mut current));
            current_tokens = 0;
        }
        current_tokens += entry.token_count;
        current.push(entry);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
