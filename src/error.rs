//! Error types for lexner.

use thiserror::Error;

/// Result type for lexner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for lexner operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Normalization of a single mention failed.
    ///
    /// Recovered inside a batch: the mention keeps its raw text.
    #[error("Normalization failed for {entity_type} '{text}': {reason}")]
    Normalization {
        /// Type label of the mention.
        entity_type: String,
        /// Raw mention text.
        text: String,
        /// What went wrong.
        reason: String,
    },

    /// Group store could not be read or written.
    #[error("Group store unavailable: {0}")]
    StoreUnavailable(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the core data model.
    #[error(transparent)]
    Core(#[from] lexner_core::Error),
}

impl Error {
    /// Create a normalization error.
    pub fn normalization(
        entity_type: impl std::fmt::Display,
        text: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Normalization {
            entity_type: entity_type.to_string(),
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a store unavailable error.
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Error::StoreUnavailable(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
