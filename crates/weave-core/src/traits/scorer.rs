use crate::errors::WeaveResult;
use crate::models::{BuildOptions, BuiltContext, ScoreResult, Suggestion};

/// Relevance and quality scoring of built contexts.
pub trait IContextScorer: Send + Sync {
    fn score(
        &self,
        context: &BuiltContext,
        query: &str,
        options: &BuildOptions,
    ) -> WeaveResult<ScoreResult>;

    /// Improvement hints derived from a previous score.
    fn suggest_improvements(
        &self,
        context: &BuiltContext,
        query: &str,
        score: &ScoreResult,
    ) -> WeaveResult<Vec<Suggestion>>;
}
