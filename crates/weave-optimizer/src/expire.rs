use chrono::{DateTime, Utc};
use weave_core::ContextEntry;

/// Drop entries whose TTL has elapsed at `now`.
pub fn remove_expired(entries: Vec<ContextEntry>, now: DateTime<Utc>) -> Vec<ContextEntry> {
    entries
        .into_iter()
        .filter(|e| !e.is_expired_at(now))
        .collect()
}
