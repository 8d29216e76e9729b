//! Error types and result aliases for Depot.
//!
//! These are the errors shared by the entity model and the collaborator
//! ports. The query engine in `depot-catalog` defines its own error type
//! and maps these into it at the crate boundary.

/// The result type used throughout `depot-core`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in core operations and collaborator ports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The artifact store has no object for the given storage key.
    ///
    /// This is a distinguishable condition, not a generic failure: callers
    /// surface it per-download rather than failing a whole result.
    #[error("artifact unavailable: {key}")]
    Unavailable {
        /// The storage key that could not be resolved.
        key: String,
    },

    /// A storage or repository collaborator failed unexpectedly.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An invalid identifier was provided.
    #[error("invalid identifier: {message}")]
    InvalidId {
        /// Description of what made the ID invalid.
        message: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred that should not happen in normal operation.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl Error {
    /// Creates a new unavailable error for the given storage key.
    #[must_use]
    pub fn unavailable(key: impl Into<String>) -> Self {
        Self::Unavailable { key: key.into() }
    }

    /// Creates a new storage error with the given message.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new storage error with a source cause.
    #[must_use]
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
