//! # weave-selector
//!
//! Picks a construction strategy per query and learns from reported quality.
//!
//! Each candidate gets `base·0.3 + feature·0.3 + historical·0.4`:
//! - base: the strategy's own quality estimate,
//! - feature: learned feature weights × the strategy's affinity table,
//! - historical: running average score for the query's feature signature.

pub mod extract;
pub mod selector;

pub use extract::extract_features;
pub use selector::{AdaptiveSelector, Confidence, PerformanceRecord, Selection, StrategyScore};
