//! ContextEntry — one atomic unit of retrieved material.

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::relevance::Relevance;
use crate::errors::SourceError;

/// Metadata bag attached to entries and contexts.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Entry payload: free text or a structured document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum EntryContent {
    Text(String),
    Structured(serde_json::Value),
}

impl EntryContent {
    /// Text form of the content. Structured content is rendered as pretty JSON.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Structured(value) => Cow::Owned(
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
            ),
        }
    }

    /// Estimated token count.
    pub fn estimate_tokens(&self) -> usize {
        match self {
            Self::Text(text) => weave_tokens::estimate_text(text),
            Self::Structured(value) => weave_tokens::estimate_value(value),
        }
    }

    /// blake3 hash of the serialized content, used for exact-duplicate detection.
    pub fn hash(&self) -> String {
        let bytes = match self {
            Self::Text(text) => text.as_bytes().to_vec(),
            Self::Structured(value) => value.to_string().into_bytes(),
        };
        blake3::hash(&bytes).to_hex().to_string()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Structured(value) => value.is_null(),
        }
    }
}

impl From<String> for EntryContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for EntryContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<serde_json::Value> for EntryContent {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

/// One retrieved, scored, possibly-transformed unit of material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// UUID v4 identifier.
    pub id: String,
    /// Name of the source that produced this entry.
    pub source: String,
    pub content: EntryContent,
    pub metadata: Metadata,
    pub relevance: Relevance,
    pub created_at: DateTime<Utc>,
    /// Lifetime relative to `created_at`. `None` never expires.
    pub ttl_secs: Option<u64>,
    /// Estimated size in tokens.
    pub token_count: usize,
    pub compressed: bool,
    pub summarized: bool,
    /// Content before the first lossy transform, for one-level rollback.
    pub original_content: Option<EntryContent>,
    /// blake3 hash of `content`.
    pub content_hash: String,
}

impl ContextEntry {
    /// Create an entry with a fresh identity, estimating its token count.
    pub fn new(
        source: impl Into<String>,
        content: impl Into<EntryContent>,
        relevance: f64,
    ) -> Self {
        let content = content.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            token_count: content.estimate_tokens(),
            content_hash: content.hash(),
            content,
            metadata: Metadata::new(),
            relevance: Relevance::new(relevance),
            created_at: Utc::now(),
            ttl_secs: None,
            compressed: false,
            summarized: false,
            original_content: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = Some(ttl.num_seconds().max(0) as u64);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Override the estimated token count.
    pub fn with_token_count(mut self, tokens: usize) -> Self {
        self.token_count = tokens;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn relevance_score(&self) -> f64 {
        self.relevance.value()
    }

    /// Age of the entry at `now`. Never negative.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).max(Duration::zero())
    }

    /// Whether the TTL has elapsed at `now`. Entries without a TTL never expire,
    /// and neither do entries whose expiry lies past the representable range.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.ttl_secs
            .and_then(|ttl| i64::try_from(ttl).ok())
            .and_then(Duration::try_seconds)
            .and_then(|ttl| self.created_at.checked_add_signed(ttl))
            .is_some_and(|expires_at| now >= expires_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Replace the content with a compressed form, keeping the original.
    pub fn apply_compression(&mut self, content: EntryContent) {
        self.apply_lossy(content);
        self.compressed = true;
    }

    /// Replace the content with a summary, keeping the original.
    pub fn apply_summary(&mut self, content: EntryContent) {
        self.apply_lossy(content);
        self.summarized = true;
    }

    fn apply_lossy(&mut self, content: EntryContent) {
        if self.original_content.is_none() {
            self.original_content = Some(std::mem::replace(&mut self.content, content));
        } else {
            self.content = content;
        }
        self.refresh_derived();
    }

    /// Restore the pre-transform content. Returns false if nothing was transformed.
    pub fn rollback(&mut self) -> bool {
        match self.original_content.take() {
            Some(original) => {
                self.content = original;
                self.compressed = false;
                self.summarized = false;
                self.refresh_derived();
                true
            }
            None => false,
        }
    }

    fn refresh_derived(&mut self) {
        self.token_count = self.content.estimate_tokens();
        self.content_hash = self.content.hash();
    }

    /// Merge with a similar entry from the same source.
    ///
    /// The more recent entry is the base. The result has a fresh identity,
    /// the higher relevance, the union of metadata (base wins on conflicts),
    /// and the base content extended with lines only the other entry carries.
    pub fn merge(&self, other: &ContextEntry) -> Result<ContextEntry, SourceError> {
        if self.source != other.source {
            return Err(SourceError::SourceMismatch {
                left: self.source.clone(),
                right: other.source.clone(),
            });
        }

        let (base, extra) = if other.created_at > self.created_at {
            (other, self)
        } else {
            (self, other)
        };

        let content = match (&base.content, &extra.content) {
            (EntryContent::Text(a), EntryContent::Text(b)) => {
                let seen: HashSet<&str> = a.lines().map(str::trim).collect();
                let additions: Vec<&str> = b
                    .lines()
                    .filter(|line| !line.trim().is_empty() && !seen.contains(line.trim()))
                    .collect();
                if additions.is_empty() {
                    EntryContent::Text(a.clone())
                } else {
                    EntryContent::Text(format!("{}\n{}", a, additions.join("\n")))
                }
            }
            (base_content, _) => base_content.clone(),
        };

        let mut metadata = extra.metadata.clone();
        for (key, value) in &base.metadata {
            metadata.insert(key.clone(), value.clone());
        }

        let mut merged = ContextEntry::new(
            base.source.clone(),
            content,
            base.relevance_score().max(extra.relevance_score()),
        );
        merged.metadata = metadata;
        merged.created_at = base.created_at;
        merged.ttl_secs = base.ttl_secs;
        Ok(merged)
    }

    /// Text rendering used when a context is flattened.
    pub fn render(&self) -> String {
        self.content.as_text().into_owned()
    }
}
