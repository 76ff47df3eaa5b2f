//! Error types for the ask crate.

/// Errors that can occur while asking a question.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AskError {
    /// The response is not one of the offered options.
    #[error("\"{0}\" is not a valid response. Try again.")]
    InvalidOption(String),

    /// The response did not match the validation pattern.
    #[error("{0}")]
    ValidationFailed(String),

    /// An empty response was given to a required question.
    #[error("You must respond to this prompt. Try again.")]
    ResponseRequired,

    /// Input was closed or interrupted before a valid answer was given.
    #[error("received interrupt")]
    Interrupted,

    /// Failed to read from or write to the terminal.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AskError {
    /// Whether asking again may produce a valid answer.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AskError::InvalidOption(_) | AskError::ValidationFailed(_) | AskError::ResponseRequired
        )
    }
}

/// Result type alias for ask operations.
pub type Result<T> = std::result::Result<T, AskError>;
