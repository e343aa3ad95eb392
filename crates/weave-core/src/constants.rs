/// Largest token budget a request or build may ask for.
pub const MAX_TOKENS_LIMIT: usize = 100_000;

/// Longest cache TTL a build or the config may ask for (one year).
pub const MAX_CACHE_TTL_MINUTES: u64 = 525_600;

/// Largest configured weight a context source may carry.
pub const MAX_SOURCE_WEIGHT: f64 = 10.0;

/// Consecutive failures after which a source is marked failing.
pub const SOURCE_FAILURE_THRESHOLD: u32 = 3;

/// Effective-weight multiplier for a failing source.
pub const FAILING_WEIGHT_FACTOR: f64 = 0.5;

/// Atom used in cache keys when the strategy is chosen automatically.
pub const AUTO_STRATEGY_ATOM: &str = "auto";

/// User segment of cache keys for callers without a user id.
pub const ANONYMOUS_USER: &str = "anonymous";
