//! Configuration with layered resolution: compiled defaults → TOML → environment.

pub mod cache_config;
pub mod defaults;
pub mod manager_config;
pub mod observability_config;
pub mod optimizer_config;
pub mod selector_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CACHE_TTL_MINUTES, MAX_TOKENS_LIMIT};
use crate::errors::ConfigError;

pub use cache_config::CacheConfig;
pub use manager_config::ManagerConfig;
pub use observability_config::ObservabilityConfig;
pub use optimizer_config::OptimizerConfig;
pub use selector_config::SelectorConfig;

/// Environment variable overriding `cache.default_ttl_minutes`.
pub const ENV_CACHE_TTL_MINUTES: &str = "WEAVE_CACHE_TTL_MINUTES";
/// Environment variable overriding `manager.default_max_tokens`.
pub const ENV_DEFAULT_MAX_TOKENS: &str = "WEAVE_DEFAULT_MAX_TOKENS";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "WEAVE_LOG_LEVEL";

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    pub optimizer: OptimizerConfig,
    pub cache: CacheConfig,
    pub selector: SelectorConfig,
    pub manager: ManagerConfig,
    pub observability: ObservabilityConfig,
}

impl WeaveConfig {
    /// Load configuration from a TOML string. Missing keys keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load a TOML file, apply environment overrides, and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut config: WeaveConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `WEAVE_*` environment overrides. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(ttl) = env_parse::<u64>(ENV_CACHE_TTL_MINUTES) {
            self.cache.default_ttl_minutes = ttl;
        }
        if let Some(max_tokens) = env_parse::<usize>(ENV_DEFAULT_MAX_TOKENS) {
            self.manager.default_max_tokens = max_tokens;
        }
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            if !level.trim().is_empty() {
                self.observability.log_level = level.trim().to_lowercase();
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let o = &self.optimizer;
        unit_interval("optimizer.similarity_threshold", o.similarity_threshold)?;
        unit_interval("optimizer.merge_threshold", o.merge_threshold)?;
        unit_interval("optimizer.min_relevance_score", o.min_relevance_score)?;
        unit_interval("optimizer.aggressive_relevance_floor", o.aggressive_relevance_floor)?;
        unit_interval("optimizer.merge_reduction", o.merge_reduction)?;
        if !(o.summary_ratio > 0.0 && o.summary_ratio <= 1.0) {
            return Err(invalid("optimizer.summary_ratio", "must be within (0.0, 1.0]"));
        }
        if o.aggressive_factor < 1.0 {
            return Err(invalid("optimizer.aggressive_factor", "must be at least 1.0"));
        }

        let ttl = self.cache.default_ttl_minutes;
        if ttl == 0 || ttl > MAX_CACHE_TTL_MINUTES {
            return Err(invalid(
                "cache.default_ttl_minutes",
                "must be within 1..=525600",
            ));
        }
        if self.cache.sweep_interval_secs == 0 {
            return Err(invalid("cache.sweep_interval_secs", "must be greater than 0"));
        }

        let s = &self.selector;
        unit_interval("selector.learning_rate", s.learning_rate)?;
        unit_interval("selector.target_score", s.target_score)?;
        unit_interval("selector.initial_feature_weight", s.initial_feature_weight)?;
        unit_interval("selector.neutral_score", s.neutral_score)?;
        let weight_sum = s.base_weight + s.feature_weight + s.historical_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(invalid(
                "selector.base_weight",
                "base, feature and historical weights must sum to 1.0",
            ));
        }
        if s.medium_confidence_gap > s.high_confidence_gap {
            return Err(invalid(
                "selector.medium_confidence_gap",
                "must not exceed selector.high_confidence_gap",
            ));
        }

        const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.observability.log_level.trim().to_lowercase().as_str()) {
            return Err(invalid(
                "observability.log_level",
                "must be one of trace, debug, info, warn, error",
            ));
        }

        let max_tokens = self.manager.default_max_tokens;
        if max_tokens == 0 || max_tokens > MAX_TOKENS_LIMIT {
            return Err(invalid(
                "manager.default_max_tokens",
                "must be within 1..=100000",
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be between 0.0 and 1.0"))
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
