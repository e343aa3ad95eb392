//! Query feature vocabulary shared by strategies (affinity tables) and the selector.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::strategy::StrategyKind;

/// Query length bucket by character count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryLength {
    Short,
    Medium,
    Long,
}

impl QueryLength {
    pub fn from_chars(chars: usize) -> Self {
        match chars {
            c if c < 20 => Self::Short,
            c if c < 100 => Self::Medium,
            _ => Self::Long,
        }
    }
}

/// Token budget bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSize {
    Small,
    Medium,
    Large,
}

impl ContextSize {
    pub fn from_max_tokens(max_tokens: usize) -> Self {
        match max_tokens {
            t if t < 8_000 => Self::Small,
            t if t < 32_000 => Self::Medium,
            _ => Self::Large,
        }
    }
}

/// Names of the extracted features; learned weights are keyed by these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    QueryLength,
    HasCodeContext,
    HasCursorPosition,
    HasMultipleFiles,
    HasProjectContext,
    IsCompletion,
    IsGeneration,
    IsAnalysis,
    ContextSize,
}

impl FeatureName {
    pub const ALL: [FeatureName; 9] = [
        Self::QueryLength,
        Self::HasCodeContext,
        Self::HasCursorPosition,
        Self::HasMultipleFiles,
        Self::HasProjectContext,
        Self::IsCompletion,
        Self::IsGeneration,
        Self::IsAnalysis,
        Self::ContextSize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::QueryLength => "query_length",
            Self::HasCodeContext => "has_code_context",
            Self::HasCursorPosition => "has_cursor_position",
            Self::HasMultipleFiles => "has_multiple_files",
            Self::HasProjectContext => "has_project_context",
            Self::IsCompletion => "is_completion",
            Self::IsGeneration => "is_generation",
            Self::IsAnalysis => "is_analysis",
            Self::ContextSize => "context_size",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feature that is present in a query, with its bucket for categorical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFeature {
    QueryLength(QueryLength),
    HasCodeContext,
    HasCursorPosition,
    HasMultipleFiles,
    HasProjectContext,
    IsCompletion,
    IsGeneration,
    IsAnalysis,
    ContextSize(ContextSize),
}

impl QueryFeature {
    pub fn name(self) -> FeatureName {
        match self {
            Self::QueryLength(_) => FeatureName::QueryLength,
            Self::HasCodeContext => FeatureName::HasCodeContext,
            Self::HasCursorPosition => FeatureName::HasCursorPosition,
            Self::HasMultipleFiles => FeatureName::HasMultipleFiles,
            Self::HasProjectContext => FeatureName::HasProjectContext,
            Self::IsCompletion => FeatureName::IsCompletion,
            Self::IsGeneration => FeatureName::IsGeneration,
            Self::IsAnalysis => FeatureName::IsAnalysis,
            Self::ContextSize(_) => FeatureName::ContextSize,
        }
    }

    pub fn is_boolean(self) -> bool {
        !matches!(self, Self::QueryLength(_) | Self::ContextSize(_))
    }
}

/// The fixed feature record extracted from a query and its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryFeatures {
    pub query_length: QueryLength,
    pub has_code_context: bool,
    pub has_cursor_position: bool,
    pub has_multiple_files: bool,
    pub has_project_context: bool,
    pub is_completion: bool,
    pub is_generation: bool,
    pub is_analysis: bool,
    pub context_size: ContextSize,
}

impl QueryFeatures {
    /// Features that contribute to scoring: both buckets plus every true flag.
    pub fn active(&self) -> Vec<QueryFeature> {
        let mut active = vec![QueryFeature::QueryLength(self.query_length)];
        active.extend(self.true_flags_as_features());
        active.push(QueryFeature::ContextSize(self.context_size));
        active
    }

    /// Names of the boolean features that are true.
    pub fn true_flags(&self) -> Vec<FeatureName> {
        self.true_flags_as_features()
            .into_iter()
            .map(QueryFeature::name)
            .collect()
    }

    fn true_flags_as_features(&self) -> Vec<QueryFeature> {
        [
            (self.has_code_context, QueryFeature::HasCodeContext),
            (self.has_cursor_position, QueryFeature::HasCursorPosition),
            (self.has_multiple_files, QueryFeature::HasMultipleFiles),
            (self.has_project_context, QueryFeature::HasProjectContext),
            (self.is_completion, QueryFeature::IsCompletion),
            (self.is_generation, QueryFeature::IsGeneration),
            (self.is_analysis, QueryFeature::IsAnalysis),
        ]
        .into_iter()
        .filter_map(|(on, feature)| on.then_some(feature))
        .collect()
    }

    pub fn signature(&self) -> FeatureSignature {
        FeatureSignature {
            is_completion: self.is_completion,
            is_generation: self.is_generation,
            is_analysis: self.is_analysis,
            has_code_context: self.has_code_context,
            context_size: self.context_size,
        }
    }
}

/// Key for historical performance lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureSignature {
    pub is_completion: bool,
    pub is_generation: bool,
    pub is_analysis: bool,
    pub has_code_context: bool,
    pub context_size: ContextSize,
}

/// A strategy's affinity for each feature. Unlisted features read as 0.5.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureAffinity {
    table: HashMap<QueryFeature, f64>,
}

impl FeatureAffinity {
    pub const DEFAULT_AFFINITY: f64 = 0.5;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: QueryFeature, affinity: f64) -> Self {
        self.table.insert(feature, affinity.clamp(0.0, 1.0));
        self
    }

    pub fn get(&self, feature: QueryFeature) -> f64 {
        self.table
            .get(&feature)
            .copied()
            .unwrap_or(Self::DEFAULT_AFFINITY)
    }

    /// Built-in table for each known strategy.
    pub fn for_kind(kind: StrategyKind) -> Self {
        use QueryFeature as F;
        let pairs: &[(QueryFeature, f64)] = match kind {
            StrategyKind::Fim => &[
                (F::HasCursorPosition, 1.0),
                (F::IsCompletion, 0.9),
                (F::HasCodeContext, 0.8),
                (F::IsGeneration, 0.3),
                (F::IsAnalysis, 0.2),
                (F::HasMultipleFiles, 0.3),
                (F::HasProjectContext, 0.4),
                (F::QueryLength(QueryLength::Short), 0.8),
                (F::QueryLength(QueryLength::Long), 0.3),
                (F::ContextSize(ContextSize::Small), 0.8),
                (F::ContextSize(ContextSize::Large), 0.3),
            ],
            StrategyKind::Rag => &[
                (F::HasProjectContext, 0.9),
                (F::IsAnalysis, 0.8),
                (F::HasMultipleFiles, 0.7),
                (F::IsGeneration, 0.6),
                (F::HasCursorPosition, 0.3),
                (F::IsCompletion, 0.4),
                (F::QueryLength(QueryLength::Long), 0.7),
                (F::QueryLength(QueryLength::Medium), 0.6),
                (F::ContextSize(ContextSize::Medium), 0.7),
            ],
            StrategyKind::LongContext => &[
                (F::HasMultipleFiles, 0.9),
                (F::ContextSize(ContextSize::Large), 1.0),
                (F::ContextSize(ContextSize::Small), 0.2),
                (F::IsAnalysis, 0.7),
                (F::QueryLength(QueryLength::Long), 0.8),
                (F::HasProjectContext, 0.7),
                (F::HasCursorPosition, 0.2),
                (F::IsCompletion, 0.3),
            ],
        };
        pairs
            .iter()
            .fold(Self::new(), |acc, &(feature, affinity)| acc.with(feature, affinity))
    }
}
