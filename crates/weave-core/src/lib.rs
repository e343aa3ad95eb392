//! # weave-core
//!
//! Shared data model, collaborator traits, errors, config, and constants for
//! weave context assembly.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::WeaveConfig;
pub use errors::{WeaveError, WeaveResult};
pub use models::{BuildOptions, BuiltContext, ContextEntry, StrategyKind, StrategySelection};
pub use traits::{IContextScorer, IContextStrategy};
