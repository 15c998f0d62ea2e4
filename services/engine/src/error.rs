//! services/engine/src/error.rs
//!
//! Defines the primary error type for the engine host service.

use crate::config::ConfigError;
use bookshare_core::{EngineError, PortError};

/// The primary error type for the `engine` service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error returned by an engine operation.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Represents an error that propagated up from one of the adapters.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a malformed catalog seed document.
    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    /// Represents a standard Input/Output error (e.g., reading the catalog file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
