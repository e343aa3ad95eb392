//! # weave-manager
//!
//! The entry point for building context:
//!
//! ```text
//! key → cache hit? ──yes──▶ cached context (from_cache = true)
//!          │ no
//!          ▼
//!   explicit strategy or adaptive selection → strategy.build
//!          → optimizer (budget fit) → cache write → context
//! ```
//!
//! Quality feedback flows back into the selector; invalidation goes to the cache.

pub mod builder;
pub mod invalidation;
pub mod manager;

pub use builder::ContextManagerBuilder;
pub use invalidation::CacheInvalidation;
pub use manager::ContextManager;

pub use weave_cache::CacheStats;
pub use weave_selector::{Confidence, Selection, StrategyScore};
