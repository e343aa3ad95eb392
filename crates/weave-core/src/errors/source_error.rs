/// Context source and entry errors.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source weight must be within 0..=10, got {weight}")]
    InvalidWeight { weight: f64 },

    #[error("cannot merge entries from different sources: {left} and {right}")]
    SourceMismatch { left: String, right: String },
}
