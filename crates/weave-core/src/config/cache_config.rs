use serde::{Deserialize, Serialize};

use super::defaults;

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL applied when a build does not request one (minutes).
    pub default_ttl_minutes: u64,
    /// Interval between background expiry sweeps (seconds).
    pub sweep_interval_secs: u64,
    /// Run the background sweeper at all.
    pub sweep_enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_minutes: defaults::DEFAULT_CACHE_TTL_MINUTES,
            sweep_interval_secs: defaults::DEFAULT_SWEEP_INTERVAL_SECS,
            sweep_enabled: defaults::DEFAULT_SWEEP_ENABLED,
        }
    }
}
