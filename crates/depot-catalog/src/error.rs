//! Error types for depot-catalog operations.
//!
//! Absent entities are not errors: expected lookups return `Ok(None)`.
//! The variants here cover caller faults, collaborator faults and data
//! that violates the catalog invariants. `Unavailable` is an internal
//! signal only; by the time a composed view leaves the facade it has been
//! turned into a per-download marker, never a failed request.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur during catalog query operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed filter input, e.g. a negative limit. Rejected at the
    /// facade boundary before any repository call.
    #[error("invalid filter: {message}")]
    InvalidFilter {
        /// Description of the caller fault.
        message: String,
    },

    /// The artifact store has no object for a download's storage key.
    #[error("artifact unavailable: {key}")]
    Unavailable {
        /// The storage key that could not be resolved.
        key: String,
    },

    /// A repository or storage collaborator failed unexpectedly. Never
    /// retried here; retry policy belongs to the collaborator.
    #[error("collaborator failure: {message}")]
    Collaborator {
        /// Description of the failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A collaborator returned data violating the catalog invariants,
    /// e.g. a version whose family reference resolves to nothing.
    #[error("catalog integrity violation: {message}")]
    Integrity {
        /// Description of the violation.
        message: String,
    },
}

impl CatalogError {
    /// Creates a new invalid-filter error.
    #[must_use]
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
        }
    }

    /// Creates a new integrity error.
    #[must_use]
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

impl From<depot_core::Error> for CatalogError {
    fn from(err: depot_core::Error) -> Self {
        match err {
            depot_core::Error::Unavailable { key } => Self::Unavailable { key },
            other => Self::Collaborator {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}
