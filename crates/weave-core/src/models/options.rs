//! Typed build options, validated once at the manager boundary.

use serde::{Deserialize, Serialize};

use super::strategy::StrategySelection;
use crate::constants::{MAX_CACHE_TTL_MINUTES, MAX_TOKENS_LIMIT};
use crate::errors::{WeaveError, WeaveResult};

/// Editor cursor location, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: u32,
    pub column: u32,
}

impl CursorPosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Options recognized by a context build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub strategy: StrategySelection,
    /// Token budget; `None` falls back to the configured default.
    pub max_tokens: Option<usize>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub project_id: Option<String>,
    pub cursor_position: Option<CursorPosition>,
    pub file_content: Option<String>,
    pub files: Vec<String>,
    pub skip_cache: bool,
    pub skip_optimization: bool,
    /// Cache lifetime; `None` falls back to the configured default.
    pub cache_ttl_minutes: Option<u64>,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: impl Into<StrategySelection>) -> Self {
        self.strategy = strategy.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_cursor(mut self, line: u32, column: u32) -> Self {
        self.cursor_position = Some(CursorPosition::new(line, column));
        self
    }

    pub fn with_file_content(mut self, content: impl Into<String>) -> Self {
        self.file_content = Some(content.into());
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn skip_cache(mut self) -> Self {
        self.skip_cache = true;
        self
    }

    pub fn skip_optimization(mut self) -> Self {
        self.skip_optimization = true;
        self
    }

    pub fn with_cache_ttl(mut self, minutes: u64) -> Self {
        self.cache_ttl_minutes = Some(minutes);
        self
    }

    pub fn max_tokens_or(&self, default: usize) -> usize {
        self.max_tokens.unwrap_or(default)
    }

    pub fn cache_ttl_or(&self, default: u64) -> u64 {
        self.cache_ttl_minutes.unwrap_or(default)
    }

    pub fn strategy_atom(&self) -> &'static str {
        self.strategy.atom()
    }

    /// Validate field ranges.
    pub fn validate(&self) -> WeaveResult<()> {
        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 || max_tokens > MAX_TOKENS_LIMIT {
                return Err(invalid(
                    "max_tokens",
                    format!("must be within 1..={MAX_TOKENS_LIMIT}, got {max_tokens}"),
                ));
            }
        }
        if let Some(ttl) = self.cache_ttl_minutes {
            if ttl == 0 || ttl > MAX_CACHE_TTL_MINUTES {
                return Err(invalid(
                    "cache_ttl_minutes",
                    format!("must be within 1..={MAX_CACHE_TTL_MINUTES}, got {ttl}"),
                ));
            }
        }
        for (field, value) in [
            ("user_id", &self.user_id),
            ("session_id", &self.session_id),
            ("project_id", &self.project_id),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(invalid(field, "must not be blank".into()));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> WeaveError {
    WeaveError::InvalidOptions {
        field: field.to_string(),
        reason,
    }
}
