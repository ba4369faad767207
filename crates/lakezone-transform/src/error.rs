//! Error types for the transform pipeline
//!
//! Reading the raw zone and writing the processed zone are the only
//! fallible boundaries; both are fatal to the run. A malformed batch
//! schema (missing dedup key or recency field) is not an error; those
//! stages degrade to a pass-through.

use thiserror::Error;

/// Result type alias for transform operations
pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Error, Debug)]
pub enum TransformError {
    /// The raw zone could not be listed or a landed object could not be
    /// fetched.
    #[error("Failed to read raw zone: {0}")]
    Read(String),

    /// The partitioned write failed. There is no partial-output contract;
    /// the whole run fails.
    #[error("Partitioned write failed: {0}")]
    Write(String),
}
