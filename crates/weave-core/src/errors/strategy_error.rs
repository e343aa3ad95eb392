/// Errors raised by context construction strategies.
///
/// These come from outside this workspace and are surfaced to callers unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("strategy {strategy} failed to build context: {reason}")]
    BuildFailed { strategy: String, reason: String },

    #[error("strategy {strategy} does not support {query_type} queries")]
    UnsupportedQuery { strategy: String, query_type: String },
}
