// Single source of truth for all default values.

// --- Optimizer ---
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_MERGE_THRESHOLD: f64 = 0.7;
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 1_000;
pub const DEFAULT_MIN_RELEVANCE_SCORE: f64 = 0.2;
pub const DEFAULT_SUMMARY_RATIO: f64 = 0.3;
pub const DEFAULT_AGGRESSIVE_RELEVANCE_FLOOR: f64 = 0.7;
pub const DEFAULT_AGGRESSIVE_FACTOR: f64 = 1.5;
pub const DEFAULT_MERGE_REDUCTION: f64 = 0.3;

// --- Cache ---
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 15;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SWEEP_ENABLED: bool = true;

// --- Selector ---
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_TARGET_SCORE: f64 = 0.7;
pub const DEFAULT_BASE_SCORE_WEIGHT: f64 = 0.3;
pub const DEFAULT_FEATURE_SCORE_WEIGHT: f64 = 0.3;
pub const DEFAULT_HISTORICAL_SCORE_WEIGHT: f64 = 0.4;
pub const DEFAULT_INITIAL_FEATURE_WEIGHT: f64 = 0.5;
pub const DEFAULT_NEUTRAL_SCORE: f64 = 0.5;
pub const DEFAULT_HIGH_CONFIDENCE_GAP: f64 = 0.3;
pub const DEFAULT_MEDIUM_CONFIDENCE_GAP: f64 = 0.1;

// --- Manager ---
pub const DEFAULT_MAX_TOKENS: usize = 8_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
