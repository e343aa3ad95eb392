use crate::errors::StrategyError;
use crate::models::{BuildOptions, BuiltContext, FeatureAffinity, QueryType, StrategyKind};

/// A pluggable algorithm that turns a query into raw context.
pub trait IContextStrategy: Send + Sync {
    /// The atom this strategy is registered under.
    fn kind(&self) -> StrategyKind;

    /// Query shapes this strategy is built for.
    fn supported_query_types(&self) -> Vec<QueryType>;

    /// Cheap self-reported quality estimate in [0.0, 1.0].
    fn estimate_quality(&self, query: &str, options: &BuildOptions) -> f64;

    /// Produce raw context for the query. Errors reach the caller unchanged.
    fn build(&self, query: &str, options: &BuildOptions) -> Result<BuiltContext, StrategyError>;

    /// Affinity table used by adaptive selection.
    fn affinity(&self) -> FeatureAffinity {
        FeatureAffinity::for_kind(self.kind())
    }
}
