use thiserror::Error;

/// Recoverable session errors; callers re-prompt on either
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Malformed initialization arguments
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Operation is meaningless at the current step or pointer
    #[error("invalid state: {0}")]
    InvalidState(String),
}
