//! Cache key derivation.

use weave_core::constants::ANONYMOUS_USER;
use weave_core::BuildOptions;

/// Deterministic key over `(user_id, session_id, strategy, query)`.
///
/// Shaped `"<user>:<blake3 hex>"` so user-scoped invalidation can match on
/// the plain user segment.
pub fn generate_key(query: &str, options: &BuildOptions) -> String {
    let user = options.user_id.as_deref().unwrap_or(ANONYMOUS_USER);
    let session = options.session_id.as_deref().unwrap_or("");

    let mut hasher = blake3::Hasher::new();
    for part in [user, session, options.strategy_atom(), query] {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{user}:{}", hasher.finalize().to_hex())
}
