//! Strategy identifiers and selection mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::AUTO_STRATEGY_ATOM;
use crate::errors::WeaveError;

/// The construction strategies known to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Fill-in-the-middle around a cursor.
    Fim,
    /// Retrieval-augmented.
    Rag,
    LongContext,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [Self::Fim, Self::Rag, Self::LongContext];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fim => "fim",
            Self::Rag => "rag",
            Self::LongContext => "long_context",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = WeaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fim" => Ok(Self::Fim),
            "rag" => Ok(Self::Rag),
            "long_context" => Ok(Self::LongContext),
            other => Err(WeaveError::InvalidStrategy {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the caller pinned a strategy or left it to the selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategySelection {
    #[default]
    Auto,
    Explicit(StrategyKind),
}

impl StrategySelection {
    /// Atom used in cache keys.
    pub fn atom(self) -> &'static str {
        match self {
            Self::Auto => AUTO_STRATEGY_ATOM,
            Self::Explicit(kind) => kind.as_str(),
        }
    }

    pub fn explicit(self) -> Option<StrategyKind> {
        match self {
            Self::Auto => None,
            Self::Explicit(kind) => Some(kind),
        }
    }
}

impl FromStr for StrategySelection {
    type Err = WeaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == AUTO_STRATEGY_ATOM {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Explicit)
        }
    }
}

impl From<StrategyKind> for StrategySelection {
    fn from(kind: StrategyKind) -> Self {
        Self::Explicit(kind)
    }
}

/// Query shapes a strategy declares support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Completion,
    Generation,
    Analysis,
    General,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completion => "completion",
            Self::Generation => "generation",
            Self::Analysis => "analysis",
            Self::General => "general",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
