use thiserror::Error;

/// Errors raised by the feedback hub.
///
/// Relay failures never reach callers of the session or panel as `Err`; they
/// are folded into fixed fallback replies. `Err` is reserved for operations
/// that were rejected before anything was sent.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A request is already outstanding")]
    Busy,

    #[error("Session has not been started")]
    SessionNotStarted,

    #[error("No feedback session is open")]
    NoActiveSession,

    #[error("No feedback form is open")]
    NoDraft,

    #[error("Professor not found: {0}")]
    ProfessorNotFound(u32),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for FeedbackError {
    fn from(err: reqwest::Error) -> Self {
        FeedbackError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
