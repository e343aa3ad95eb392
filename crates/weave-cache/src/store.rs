//! TtlCache — concurrent key→(value, expiry) store with serialized writes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use weave_core::clock::{Clock, SystemClock};
use weave_core::config::CacheConfig;
use weave_core::BuildOptions;
use weave_observability::tracing_setup::events;

use crate::stats::CacheStats;
use crate::sweeper::Sweeper;

struct CacheSlot<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

struct Shared<V> {
    entries: DashMap<String, CacheSlot<V>>,
    /// Serializes foreground mutations. Reads and the sweep never take it.
    writer: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    invalidations: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl<V> Shared<V> {
    fn write_guard(&self) -> MutexGuard<'_, ()> {
        // The guarded value is unit; a panicked writer leaves nothing half-updated.
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove every expired entry, returning how many were removed.
    ///
    /// Runs without the writer lock: each removal is a per-key `remove_if`
    /// that re-checks expiry, so a concurrent `put` of a fresh value survives.
    fn sweep_expired(&self) -> usize {
        let _span = weave_observability::cache_sweep_span!().entered();
        let now = self.clock.now();

        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|slot| slot.expires_at <= now)
            .map(|slot| slot.key().clone())
            .collect();

        let removed = expired
            .iter()
            .filter(|key| {
                self.entries
                    .remove_if(key.as_str(), |_, slot| slot.expires_at <= now)
                    .is_some()
            })
            .count();

        events::cache_swept(removed, self.entries.len());
        removed
    }
}

/// A keyed cache with per-entry TTL.
///
/// There is no capacity bound: entries leave only through expiry,
/// invalidation, or `clear`.
pub struct TtlCache<V> {
    shared: Arc<Shared<V>>,
    sweeper: Option<Sweeper>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache reading time from `clock`, starting the sweeper if enabled.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let shared = Arc::new(Shared {
            entries: DashMap::new(),
            writer: Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            puts: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            clock,
        });

        let sweeper = if config.sweep_enabled {
            let target = Arc::clone(&shared);
            Sweeper::spawn(
                StdDuration::from_secs(config.sweep_interval_secs.max(1)),
                move || target.sweep_expired(),
            )
        } else {
            None
        };

        Self { shared, sweeper }
    }

    /// Look up a live value. An expired entry is removed and counts as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.shared.clock.now();
        let lookup = match self.shared.entries.get(key) {
            Some(slot) if now < slot.expires_at => Some(Ok(slot.value.clone())),
            Some(_) => Some(Err(())),
            None => None,
        };

        match lookup {
            Some(Ok(value)) => {
                self.shared.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Some(Err(())) => {
                let _guard = self.shared.write_guard();
                self.shared
                    .entries
                    .remove_if(key, |_, slot| slot.expires_at <= now);
                self.shared.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.shared.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite with `expiry = now + ttl_minutes`.
    ///
    /// A TTL too large to represent saturates to the latest representable time.
    pub fn put(&self, key: impl Into<String>, value: V, ttl_minutes: u64) {
        let ttl = i64::try_from(ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX);
        self.put_with_ttl(key, value, ttl);
    }

    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let _guard = self.shared.write_guard();
        let expires_at = self
            .shared
            .clock
            .now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.shared
            .entries
            .insert(key.into(), CacheSlot { value, expires_at });
        self.shared.puts.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove one key. Counts as one invalidation whether or not it existed.
    pub fn invalidate(&self, key: &str) -> bool {
        let _guard = self.shared.write_guard();
        let removed = self.shared.entries.remove(key).is_some();
        self.shared.invalidations.fetch_add(1, Ordering::Relaxed);
        events::cache_invalidated("key", usize::from(removed));
        removed
    }

    /// Remove every entry belonging to `user_id`.
    ///
    /// Linear scan over all keys. Keys are `"<user>:<hex>"`, so a key belongs
    /// to `user_id` when it starts with `"<user_id>:"`.
    pub fn invalidate_pattern(&self, user_id: &str) -> usize {
        let _guard = self.shared.write_guard();
        let needle = format!("{user_id}:");
        let matching: Vec<String> = self
            .shared
            .entries
            .iter()
            .filter(|slot| slot.key().starts_with(&needle))
            .map(|slot| slot.key().clone())
            .collect();

        let removed = matching
            .iter()
            .filter(|key| self.shared.entries.remove(key.as_str()).is_some())
            .count();
        self.shared
            .invalidations
            .fetch_add(removed as u64, Ordering::Relaxed);
        events::cache_invalidated("user", removed);
        removed
    }

    /// Remove all entries. Counters are preserved.
    pub fn clear(&self) {
        let _guard = self.shared.write_guard();
        let removed = self.shared.entries.len();
        self.shared.entries.clear();
        events::cache_invalidated("all", removed);
    }

    /// Remove expired entries now rather than waiting for the sweeper.
    pub fn sweep_expired(&self) -> usize {
        self.shared.sweep_expired()
    }

    /// Ask the background sweeper to run early. No-op without a sweeper.
    pub fn request_sweep(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.request_sweep();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.shared.hits.load(Ordering::Relaxed),
            misses: self.shared.misses.load(Ordering::Relaxed),
            puts: self.shared.puts.load(Ordering::Relaxed),
            invalidations: self.shared.invalidations.load(Ordering::Relaxed),
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    /// Stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.shared.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.entries.is_empty()
    }

    /// Whether a live entry exists. Does not touch the counters.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.shared.clock.now();
        self.shared
            .entries
            .get(key)
            .is_some_and(|slot| now < slot.expires_at)
    }

    pub fn has_sweeper(&self) -> bool {
        self.sweeper.is_some()
    }

    pub fn generate_key(query: &str, options: &BuildOptions) -> String {
        crate::key::generate_key(query, options)
    }
}
