//! Error handling for weave.
//! One error enum per subsystem, `thiserror` only, rolled up into [`WeaveError`].

pub mod config_error;
pub mod request_error;
pub mod source_error;
pub mod strategy_error;
pub mod weave_error;

pub use config_error::ConfigError;
pub use request_error::RequestError;
pub use source_error::SourceError;
pub use strategy_error::StrategyError;
pub use weave_error::{WeaveError, WeaveResult};
