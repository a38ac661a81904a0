//! Error types for mika-album
//!
//! Only these two failures ever leave the pipeline. Remote-call failures in
//! optional stages are logged and absorbed where they happen.

use thiserror::Error;

/// Pipeline boundary error
#[derive(Debug, Error)]
pub enum LookupError {
    /// Required credential missing; no remote call was made
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Every primary catalog search attempt came back empty
    #[error("Not found: {0}")]
    NotFound(String),
}

impl LookupError {
    /// Short message suitable for showing to an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::Configuration(_) => "Missing Discogs API token.",
            LookupError::NotFound(_) => "No albums found for that filter.",
        }
    }
}

impl From<mika_common::Error> for LookupError {
    fn from(err: mika_common::Error) -> Self {
        LookupError::Configuration(err.to_string())
    }
}

/// Result type for pipeline operations
pub type LookupResult<T> = Result<T, LookupError>;
