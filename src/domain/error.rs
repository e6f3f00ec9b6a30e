//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors raised by the history store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store backend unreachable
    #[error("history store unavailable: {0}")]
    Unavailable(String),

    /// Append of a single message failed
    #[error("history store write failed: {0}")]
    WriteFailed(String),

    /// Per-user history query failed
    #[error("history store query failed: {0}")]
    QueryFailed(String),
}
