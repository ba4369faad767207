//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for Lakezone operations
pub type Result<T> = std::result::Result<T, LakezoneError>;

/// Main error type for cross-cutting Lakezone failures
#[derive(Error, Debug)]
pub enum LakezoneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Object store error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
