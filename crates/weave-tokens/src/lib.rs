//! # weave-tokens
//!
//! Token estimation via `tiktoken-rs` (`cl100k_base`).
//! Counts are estimates for budgeting, not a faithful model tokenizer.
//! Results are cached per blake3 content hash.

pub mod budget;
pub mod counter;

pub use budget::{allocate_sizes, Allocation};
pub use counter::{estimate_text, estimate_value, shared, TokenCounter};
