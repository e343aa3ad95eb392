use serde::{Deserialize, Serialize};
use std::fmt;

/// Relevance score clamped to [0.0, 1.0].
/// How useful an entry is to the query it was retrieved for.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Relevance(f64);

impl Relevance {
    /// Floor applied after summarizing in the aggressive fitting tier.
    pub const HIGH: f64 = 0.7;
    /// Default floor of the moderate fitting tier.
    pub const LOW: f64 = 0.2;

    /// Create a new Relevance, clamping to [0.0, 1.0]. NaN becomes 0.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Relevance {
    fn default() -> Self {
        Self(0.5)
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Relevance {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Relevance> for f64 {
    fn from(r: Relevance) -> Self {
        r.0
    }
}
