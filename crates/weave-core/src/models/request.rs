//! ContextRequest — a declarative description of needed context.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::{ContextEntry, Metadata};
use crate::constants::MAX_TOKENS_LIMIT;
use crate::errors::RequestError;

/// What the context is for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Purpose {
    CodeCompletion,
    CodeGeneration,
    CodeReview,
    Debugging,
    Documentation,
    Planning,
    Conversation,
    General,
    Custom(String),
}

impl Purpose {
    pub fn as_str(&self) -> &str {
        match self {
            Self::CodeCompletion => "code_completion",
            Self::CodeGeneration => "code_generation",
            Self::CodeReview => "code_review",
            Self::Debugging => "debugging",
            Self::Documentation => "documentation",
            Self::Planning => "planning",
            Self::Conversation => "conversation",
            Self::General => "general",
            Self::Custom(s) => s,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl Default for Purpose {
    fn default() -> Self {
        Self::General
    }
}

impl From<String> for Purpose {
    fn from(s: String) -> Self {
        match s.as_str() {
            "code_completion" => Self::CodeCompletion,
            "code_generation" => Self::CodeGeneration,
            "code_review" => Self::CodeReview,
            "debugging" => Self::Debugging,
            "documentation" => Self::Documentation,
            "planning" => Self::Planning,
            "conversation" => Self::Conversation,
            "general" => Self::General,
            _ => Self::Custom(s),
        }
    }
}

impl From<&str> for Purpose {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Purpose> for String {
    fn from(p: Purpose) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    /// Contribution of the priority to the urgency score.
    pub fn score(self) -> f64 {
        match self {
            Self::Low => 0.25,
            Self::Normal => 0.5,
            Self::High => 0.75,
            Self::Critical => 1.0,
        }
    }
}

/// One comparison against an entry field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FilterCondition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Contains(Value),
}

impl FilterCondition {
    /// Evaluate against a field value. A missing field only satisfies `ne`.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        let Some(actual) = actual else {
            return matches!(self, Self::Ne(_));
        };
        match self {
            Self::Eq(expected) => actual == expected,
            Self::Ne(expected) => actual != expected,
            Self::Gt(expected) => compare(actual, expected) == Some(Ordering::Greater),
            Self::Gte(expected) => matches!(
                compare(actual, expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt(expected) => compare(actual, expected) == Some(Ordering::Less),
            Self::Lte(expected) => matches!(
                compare(actual, expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::In(options) => options.contains(actual),
            Self::Contains(needle) => match (actual, needle) {
                (Value::String(hay), Value::String(n)) => hay.contains(n.as_str()),
                (Value::Array(items), n) => items.contains(n),
                (Value::Object(map), Value::String(k)) => map.contains_key(k),
                _ => false,
            },
        }
    }
}

/// Numbers compare numerically, strings lexicographically, anything else is incomparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// A validated request. Deserializing re-checks the construction invariants,
/// with the deadline compared against the recorded `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawContextRequest")]
pub struct ContextRequest {
    pub id: String,
    pub purpose: Purpose,
    max_tokens: usize,
    required_sources: BTreeSet<String>,
    excluded_sources: BTreeSet<String>,
    pub filters: BTreeMap<String, FilterCondition>,
    pub preferences: Metadata,
    pub priority: Priority,
    deadline: Option<DateTime<Utc>>,
    pub streaming: bool,
    pub cache_key: Option<String>,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl ContextRequest {
    pub fn builder(purpose: impl Into<Purpose>) -> ContextRequestBuilder {
        ContextRequestBuilder::new(purpose.into())
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn required_sources(&self) -> &BTreeSet<String> {
        &self.required_sources
    }

    pub fn excluded_sources(&self) -> &BTreeSet<String> {
        &self.excluded_sources
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Average of the priority score and the deadline proximity score.
    pub fn urgency_score(&self, now: DateTime<Utc>) -> f64 {
        let deadline_score = match self.deadline {
            None => 0.5,
            Some(deadline) => {
                let secs = (deadline - now).num_seconds();
                match secs {
                    s if s <= 60 => 1.0,
                    s if s <= 300 => 0.9,
                    s if s <= 900 => 0.75,
                    s if s <= 3_600 => 0.6,
                    s if s <= 86_400 => 0.4,
                    _ => 0.2,
                }
            }
        };
        (self.priority.score() + deadline_score) / 2.0
    }

    /// Whether entries from `source` may be used. Exclusion wins; a non-empty
    /// required set restricts to its members.
    pub fn allows_source(&self, source: &str) -> bool {
        if self.excluded_sources.contains(source) {
            return false;
        }
        self.required_sources.is_empty() || self.required_sources.contains(source)
    }

    /// Whether an entry passes the source rules and every filter.
    ///
    /// Filter fields resolve against entry metadata, except the pseudo-fields
    /// `source` and `relevance_score`.
    pub fn matches(&self, entry: &ContextEntry) -> bool {
        if !self.allows_source(&entry.source) {
            return false;
        }
        self.filters.iter().all(|(field, condition)| {
            let owned;
            let actual = match field.as_str() {
                "source" => {
                    owned = Value::String(entry.source.clone());
                    Some(&owned)
                }
                "relevance_score" => {
                    owned = serde_json::json!(entry.relevance_score());
                    Some(&owned)
                }
                _ => entry.metadata.get(field),
            };
            condition.matches(actual)
        })
    }

    /// Combine two requests.
    ///
    /// Requirements are unioned, the larger budget wins (capped at the global
    /// limit), the earliest deadline and highest priority are kept. On scalar
    /// or map conflicts `self` wins.
    pub fn merge(&self, other: &ContextRequest) -> Result<ContextRequest, RequestError> {
        let required: BTreeSet<String> = self
            .required_sources
            .union(&other.required_sources)
            .cloned()
            .collect();
        let excluded: BTreeSet<String> = self
            .excluded_sources
            .union(&other.excluded_sources)
            .cloned()
            .collect();
        check_disjoint(&required, &excluded)?;

        let mut filters = other.filters.clone();
        filters.extend(self.filters.clone());
        let mut preferences = other.preferences.clone();
        preferences.extend(self.preferences.clone());
        let mut metadata = other.metadata.clone();
        metadata.extend(self.metadata.clone());

        let deadline = match (self.deadline, other.deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        Ok(ContextRequest {
            id: uuid::Uuid::new_v4().to_string(),
            purpose: self.purpose.clone(),
            max_tokens: self.max_tokens.max(other.max_tokens).min(MAX_TOKENS_LIMIT),
            required_sources: required,
            excluded_sources: excluded,
            filters,
            preferences,
            priority: self.priority.max(other.priority),
            deadline,
            streaming: self.streaming || other.streaming,
            cache_key: self.cache_key.clone().or_else(|| other.cache_key.clone()),
            metadata,
            created_at: self.created_at.min(other.created_at),
        })
    }
}

/// Wire form of [`ContextRequest`] before validation.
#[derive(Deserialize)]
struct RawContextRequest {
    id: String,
    purpose: Purpose,
    max_tokens: usize,
    #[serde(default)]
    required_sources: BTreeSet<String>,
    #[serde(default)]
    excluded_sources: BTreeSet<String>,
    #[serde(default)]
    filters: BTreeMap<String, FilterCondition>,
    #[serde(default)]
    preferences: Metadata,
    priority: Priority,
    deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    streaming: bool,
    cache_key: Option<String>,
    #[serde(default)]
    metadata: Metadata,
    created_at: DateTime<Utc>,
}

impl TryFrom<RawContextRequest> for ContextRequest {
    type Error = RequestError;

    fn try_from(raw: RawContextRequest) -> Result<Self, Self::Error> {
        check_invariants(
            raw.max_tokens,
            &raw.required_sources,
            &raw.excluded_sources,
            raw.deadline,
            raw.created_at,
        )?;
        Ok(ContextRequest {
            id: raw.id,
            purpose: raw.purpose,
            max_tokens: raw.max_tokens,
            required_sources: raw.required_sources,
            excluded_sources: raw.excluded_sources,
            filters: raw.filters,
            preferences: raw.preferences,
            priority: raw.priority,
            deadline: raw.deadline,
            streaming: raw.streaming,
            cache_key: raw.cache_key,
            metadata: raw.metadata,
            created_at: raw.created_at,
        })
    }
}

/// Builder validating the request invariants once on `build`.
#[derive(Debug, Clone)]
pub struct ContextRequestBuilder {
    purpose: Purpose,
    max_tokens: usize,
    required_sources: BTreeSet<String>,
    excluded_sources: BTreeSet<String>,
    filters: BTreeMap<String, FilterCondition>,
    preferences: Metadata,
    priority: Priority,
    deadline: Option<DateTime<Utc>>,
    streaming: bool,
    cache_key: Option<String>,
    metadata: Metadata,
}

impl ContextRequestBuilder {
    fn new(purpose: Purpose) -> Self {
        Self {
            purpose,
            max_tokens: crate::config::defaults::DEFAULT_MAX_TOKENS,
            required_sources: BTreeSet::new(),
            excluded_sources: BTreeSet::new(),
            filters: BTreeMap::new(),
            preferences: Metadata::new(),
            priority: Priority::Normal,
            deadline: None,
            streaming: false,
            cache_key: None,
            metadata: Metadata::new(),
        }
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn require_source(mut self, id: impl Into<String>) -> Self {
        self.required_sources.insert(id.into());
        self
    }

    pub fn exclude_source(mut self, id: impl Into<String>) -> Self {
        self.excluded_sources.insert(id.into());
        self
    }

    pub fn filter(mut self, field: impl Into<String>, condition: FilterCondition) -> Self {
        self.filters.insert(field.into(), condition);
        self
    }

    pub fn preference(mut self, key: impl Into<String>, value: Value) -> Self {
        self.preferences.insert(key.into(), value);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn build(self) -> Result<ContextRequest, RequestError> {
        self.build_at(Utc::now())
    }

    /// Build with `now` as the creation time the deadline is checked against.
    pub fn build_at(self, now: DateTime<Utc>) -> Result<ContextRequest, RequestError> {
        check_invariants(
            self.max_tokens,
            &self.required_sources,
            &self.excluded_sources,
            self.deadline,
            now,
        )?;

        Ok(ContextRequest {
            id: uuid::Uuid::new_v4().to_string(),
            purpose: self.purpose,
            max_tokens: self.max_tokens,
            required_sources: self.required_sources,
            excluded_sources: self.excluded_sources,
            filters: self.filters,
            preferences: self.preferences,
            priority: self.priority,
            deadline: self.deadline,
            streaming: self.streaming,
            cache_key: self.cache_key,
            metadata: self.metadata,
            created_at: now,
        })
    }
}

fn check_invariants(
    max_tokens: usize,
    required: &BTreeSet<String>,
    excluded: &BTreeSet<String>,
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
) -> Result<(), RequestError> {
    if max_tokens == 0 || max_tokens > MAX_TOKENS_LIMIT {
        return Err(RequestError::InvalidMaxTokens {
            value: max_tokens,
            max: MAX_TOKENS_LIMIT,
        });
    }
    check_disjoint(required, excluded)?;
    match deadline {
        Some(deadline) if deadline <= created_at => Err(RequestError::DeadlineInPast {
            deadline: deadline.to_rfc3339(),
        }),
        _ => Ok(()),
    }
}

fn check_disjoint(
    required: &BTreeSet<String>,
    excluded: &BTreeSet<String>,
) -> Result<(), RequestError> {
    let ids: Vec<String> = required.intersection(excluded).cloned().collect();
    if ids.is_empty() {
        Ok(())
    } else {
        Err(RequestError::ConflictingSources { ids })
    }
}
