//! Error types for the ingestion pipeline
//!
//! Configuration failures are fatal to the whole run. Fetch and landing
//! failures are scoped to one source; the orchestrator records them in the
//! report and keeps going.

use std::fmt;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error taxonomy for one ingestion run
///
/// `Display` and `Error` are implemented by hand: the `source` fields
/// name the ingestion source, and a derive would misread them as the
/// error's cause.
#[derive(Debug)]
pub enum IngestError {
    /// The source list itself could not be obtained or is invalid.
    /// Aborts the run before any source is attempted.
    Config(String),

    /// One source's HTTP call failed (transport, status, or body).
    Fetch { source: String, message: String },

    /// One source's payload could not be written to the raw zone.
    Land { source: String, message: String },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Config(message) => write!(f, "Configuration error: {}", message),
            IngestError::Fetch { source, message } => {
                write!(f, "Fetch failed for source '{}': {}", source, message)
            },
            IngestError::Land { source, message } => {
                write!(f, "Landing failed for source '{}': {}", source, message)
            },
        }
    }
}

impl std::error::Error for IngestError {}

impl IngestError {
    /// The source this error is scoped to, if it is a per-source error.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            IngestError::Config(_) => None,
            IngestError::Fetch { source, .. } | IngestError::Land { source, .. } => Some(source),
        }
    }
}
