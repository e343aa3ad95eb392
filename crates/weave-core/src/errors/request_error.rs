/// Context request construction errors.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("max_tokens must be within 1..={max}, got {value}")]
    InvalidMaxTokens { value: usize, max: usize },

    #[error("sources both required and excluded: {ids:?}")]
    ConflictingSources { ids: Vec<String> },

    #[error("deadline {deadline} is not in the future")]
    DeadlineInPast { deadline: String },
}
