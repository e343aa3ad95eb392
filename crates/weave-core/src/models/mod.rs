pub mod built_context;
pub mod entry;
pub mod features;
pub mod options;
pub mod relevance;
pub mod request;
pub mod score;
pub mod source;
pub mod strategy;

pub use built_context::BuiltContext;
pub use entry::{ContextEntry, EntryContent, Metadata};
pub use features::{
    ContextSize, FeatureAffinity, FeatureName, FeatureSignature, QueryFeature, QueryFeatures,
    QueryLength,
};
pub use options::{BuildOptions, CursorPosition};
pub use relevance::Relevance;
pub use request::{ContextRequest, ContextRequestBuilder, FilterCondition, Priority, Purpose};
pub use score::{ScoreResult, Suggestion};
pub use source::{
    ContextSource, EntryTransformer, EntryValidator, SourceCacheConfig, SourceMetrics,
    SourceStatus, SourceType,
};
pub use strategy::{QueryType, StrategyKind, StrategySelection};
