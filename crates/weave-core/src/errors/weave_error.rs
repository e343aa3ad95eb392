use super::{ConfigError, RequestError, SourceError, StrategyError};

/// Top-level error type for every public weave operation.
#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    #[error("invalid strategy: {name}")]
    InvalidStrategy { name: String },

    #[error("no context strategies registered")]
    NoStrategiesAvailable,

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error("invalid option {field}: {reason}")]
    InvalidOptions { field: String, reason: String },

    #[error("quality score must be within 0.0..=1.0, got {score}")]
    InvalidQualityScore { score: f64 },

    #[error("no context scorer configured")]
    ScorerUnavailable,

    #[error("request error: {0}")]
    Request(#[from] RequestError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type WeaveResult<T> = Result<T, WeaveError>;
