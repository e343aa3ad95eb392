//! # weave-cache
//!
//! Keyed result cache with per-entry expiry.
//!
//! Reads go straight to a concurrent map; every mutation is serialized
//! through one writer lock. Expiry is checked on every read, so the
//! background sweeper only reclaims memory early.

pub mod key;
pub mod stats;
pub mod store;
mod sweeper;

pub use key::generate_key;
pub use stats::CacheStats;
pub use store::TtlCache;

/// The cache of built contexts used by the manager.
pub type ContextCache = TtlCache<weave_core::BuiltContext>;
