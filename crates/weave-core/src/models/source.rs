//! ContextSource — a registered provider of entries with a health state machine.
//!
//! ```text
//! active ──3 consecutive failures──▶ failing ──success──▶ active
//!    │                                  │
//!    └──disable/deactivate──▶ disabled / inactive ──enable/reset──▶ active
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::ContextEntry;
use crate::constants::{FAILING_WEIGHT_FACTOR, MAX_SOURCE_WEIGHT, SOURCE_FAILURE_THRESHOLD};
use crate::errors::SourceError;

/// Hook mapping every fetched entry before it enters the pipeline.
pub type EntryTransformer = Arc<dyn Fn(ContextEntry) -> ContextEntry + Send + Sync>;
/// Hook deciding whether a fetched entry is kept.
pub type EntryValidator = Arc<dyn Fn(&ContextEntry) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Memory,
    CodeAnalysis,
    Documentation,
    Conversation,
    Planning,
    Custom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    #[default]
    Active,
    Failing,
    Disabled,
    Inactive,
}

impl SourceStatus {
    /// Disabled and inactive are only left through explicit administrative calls.
    pub fn is_administrative(self) -> bool {
        matches!(self, Self::Disabled | Self::Inactive)
    }
}

/// Per-source caching preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCacheConfig {
    pub enabled: bool,
    pub ttl_minutes: u64,
}

impl Default for SourceCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_minutes: crate::config::defaults::DEFAULT_CACHE_TTL_MINUTES,
        }
    }
}

/// Rolling fetch metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetrics {
    pub fetch_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    /// Running mean over all fetches.
    pub avg_latency_ms: f64,
    pub entries_delivered: u64,
    pub last_error: Option<String>,
}

impl SourceMetrics {
    fn record_fetch(&mut self, latency_ms: f64) {
        self.fetch_count += 1;
        self.avg_latency_ms += (latency_ms - self.avg_latency_ms) / self.fetch_count as f64;
    }
}

/// A registered provider of context entries.
#[derive(Clone, Serialize, Deserialize)]
pub struct ContextSource {
    pub id: String,
    pub name: String,
    pub source_type: SourceType,
    weight: f64,
    status: SourceStatus,
    pub last_fetch_at: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    #[serde(skip)]
    transformer: Option<EntryTransformer>,
    #[serde(skip)]
    validator: Option<EntryValidator>,
    pub cache: SourceCacheConfig,
    pub metrics: SourceMetrics,
}

impl ContextSource {
    /// Create an active source. Weight must be within 0..=10.
    pub fn new(
        name: impl Into<String>,
        source_type: SourceType,
        weight: f64,
    ) -> Result<Self, SourceError> {
        validate_weight(weight)?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            source_type,
            weight,
            status: SourceStatus::Active,
            last_fetch_at: None,
            consecutive_failures: 0,
            transformer: None,
            validator: None,
            cache: SourceCacheConfig::default(),
            metrics: SourceMetrics::default(),
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_transformer(mut self, transformer: EntryTransformer) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn with_validator(mut self, validator: EntryValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_cache(mut self, cache: SourceCacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) -> Result<(), SourceError> {
        validate_weight(weight)?;
        self.weight = weight;
        Ok(())
    }

    pub fn status(&self) -> SourceStatus {
        self.status
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Configured weight discounted by health status.
    pub fn effective_weight(&self) -> f64 {
        match self.status {
            SourceStatus::Active => self.weight,
            SourceStatus::Failing => self.weight * FAILING_WEIGHT_FACTOR,
            SourceStatus::Disabled | SourceStatus::Inactive => 0.0,
        }
    }

    /// Whether entries from this source should be used at all.
    pub fn is_usable(&self) -> bool {
        self.effective_weight() > 0.0
    }

    /// Record a successful fetch that delivered `delivered` entries.
    pub fn record_success(&mut self, latency_ms: f64, delivered: usize) {
        self.consecutive_failures = 0;
        self.last_fetch_at = Some(Utc::now());
        self.metrics.record_fetch(latency_ms);
        self.metrics.success_count += 1;
        self.metrics.entries_delivered += delivered as u64;
        if self.status == SourceStatus::Failing {
            self.status = SourceStatus::Active;
        }
    }

    /// Record a failed fetch.
    pub fn record_failure(&mut self, reason: impl Into<String>, latency_ms: f64) {
        self.consecutive_failures += 1;
        self.last_fetch_at = Some(Utc::now());
        self.metrics.record_fetch(latency_ms);
        self.metrics.failure_count += 1;
        self.metrics.last_error = Some(reason.into());
        if !self.status.is_administrative()
            && self.consecutive_failures >= SOURCE_FAILURE_THRESHOLD
        {
            self.status = SourceStatus::Failing;
        }
    }

    pub fn disable(&mut self) {
        self.status = SourceStatus::Disabled;
    }

    pub fn deactivate(&mut self) {
        self.status = SourceStatus::Inactive;
    }

    /// Return to active with a clean failure count.
    pub fn enable(&mut self) {
        self.status = SourceStatus::Active;
        self.consecutive_failures = 0;
    }

    /// Return to active and clear failure count and metrics.
    pub fn reset(&mut self) {
        self.enable();
        self.metrics = SourceMetrics::default();
        self.last_fetch_at = None;
    }

    /// Run the validator then the transformer over fetched entries.
    pub fn apply_hooks(&self, entries: Vec<ContextEntry>) -> Vec<ContextEntry> {
        entries
            .into_iter()
            .filter(|e| self.validator.as_ref().map_or(true, |v| v(e)))
            .map(|e| match &self.transformer {
                Some(t) => t(e),
                None => e,
            })
            .collect()
    }
}

impl fmt::Debug for ContextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSource")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("source_type", &self.source_type)
            .field("weight", &self.weight)
            .field("status", &self.status)
            .field("consecutive_failures", &self.consecutive_failures)
            .field("has_transformer", &self.transformer.is_some())
            .field("has_validator", &self.validator.is_some())
            .field("cache", &self.cache)
            .field("metrics", &self.metrics)
            .finish()
    }
}

fn validate_weight(weight: f64) -> Result<(), SourceError> {
    if (0.0..=MAX_SOURCE_WEIGHT).contains(&weight) {
        Ok(())
    } else {
        Err(SourceError::InvalidWeight { weight })
    }
}
