//! # weave-observability
//!
//! Structured logging for weave: subscriber initialization, one span per
//! pipeline operation, and structured events for the decisions worth auditing.

pub mod tracing_setup;

pub use tracing_setup::{
    init_tracing, init_tracing_from_config, init_tracing_json, init_tracing_with_filter,
    LOG_ENV_VAR,
};
