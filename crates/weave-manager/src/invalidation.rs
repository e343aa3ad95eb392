use serde::{Deserialize, Serialize};

/// What to drop from the result cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "value")]
pub enum CacheInvalidation {
    /// One exact cache key.
    Key(String),
    /// Every entry built for a user id.
    User(String),
    All,
}
