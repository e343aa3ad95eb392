use std::sync::{Arc, OnceLock};

use moka::sync::Cache;
use tiktoken_rs::CoreBPE;

/// Process-wide counter used by the free estimation helpers.
static SHARED: OnceLock<TokenCounter> = OnceLock::new();

/// Token counter wrapping tiktoken's cl100k_base tokenizer.
/// Caches results per blake3 content hash.
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    /// Create a new TokenCounter with the given cache capacity.
    pub fn new(cache_capacity: u64) -> Self {
        let bpe = tiktoken_rs::cl100k_base().expect("failed to load cl100k_base tokenizer");
        Self {
            bpe: Arc::new(bpe),
            cache: Cache::new(cache_capacity),
        }
    }

    /// Count tokens in the given text (uncached).
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Count tokens with blake3 content-hash caching.
    pub fn count_cached(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        self.cache.get_with(hash, || self.count(text))
    }

    /// Count tokens of a structured value by its compact JSON serialization.
    pub fn count_value(&self, value: &serde_json::Value) -> usize {
        match value {
            serde_json::Value::Null => 0,
            serde_json::Value::String(s) => self.count_cached(s),
            other => self.count_cached(&other.to_string()),
        }
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(10_000)
    }
}

/// The lazily-initialized process-wide counter.
pub fn shared() -> &'static TokenCounter {
    SHARED.get_or_init(TokenCounter::default)
}

/// Estimate the token count of a text using the shared counter.
pub fn estimate_text(text: &str) -> usize {
    shared().count_cached(text)
}

/// Estimate the token count of a structured value using the shared counter.
pub fn estimate_value(value: &serde_json::Value) -> usize {
    shared().count_value(value)
}
