use limitbook_ports::{MatchingError, ValidationError};
use thiserror::Error;

use crate::infrastructure::ConfigError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Order rejected: {0}")]
    Validation(#[from] ValidationError),

    /// The book was found corrupt mid-match; no further work is accepted
    #[error("Book invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Book has failed and refuses further work")]
    BookFailed,

    #[error("Matching service has stopped")]
    ServiceStopped,

    #[error("Failed to start matching thread: {0}")]
    Spawn(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::InvariantViolation(_) | EngineError::BookFailed
        )
    }
}

impl From<MatchingError> for EngineError {
    fn from(err: MatchingError) -> Self {
        match err {
            MatchingError::Validation(e) => EngineError::Validation(e),
            MatchingError::InvariantViolation(msg) => EngineError::InvariantViolation(msg),
        }
    }
}
