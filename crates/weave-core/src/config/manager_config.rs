use serde::{Deserialize, Serialize};

use super::defaults;

/// Manager façade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Token budget used when a build does not specify one.
    pub default_max_tokens: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_max_tokens: defaults::DEFAULT_MAX_TOKENS,
        }
    }
}
