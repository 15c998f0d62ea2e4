//! crates/bookshare_core/src/error.rs
//!
//! Defines the error type returned by every engine operation.

use crate::ports::PortError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Malformed caller input, e.g. a rating outside 1..=5 or a zero limit.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The book store failed to read or save.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The push sender failed on a path that does not swallow failures.
    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

impl From<PortError> for EngineError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => EngineError::NotFound(what),
            PortError::Unexpected(msg) | PortError::Unavailable(msg) => EngineError::Storage(msg),
        }
    }
}

/// A convenience type alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;
