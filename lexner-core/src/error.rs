//! Error types for lexner-core.

use thiserror::Error;

/// Result type for lexner-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for lexner-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Entity type label outside the closed set.
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),
}

impl Error {
    /// Create an unknown entity type error.
    #[must_use]
    pub fn unknown_entity_type(label: impl Into<String>) -> Self {
        Self::UnknownEntityType(label.into())
    }
}
