//! Error type shared by every store implementation.

use std::fmt;

/// Boxed lower-level error kept as the `source` of a [`StoreError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which direction a schema run was going when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPhase {
    Migrate,
    Drop,
}

impl fmt::Display for SchemaPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaPhase::Migrate => f.write_str("migrating schema"),
            SchemaPhase::Drop => f.write_str("dropping schema"),
        }
    }
}

/// Errors returned by [`super::Store`], [`super::UserStore`] and [`super::UrlStore`].
///
/// Every variant names the operation or entity involved so a failure can be
/// traced back to its origin without a stack trace. Variants wrapping a
/// backend failure keep it as [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or verified.
    #[error("{context}")]
    Connection {
        context: &'static str,
        #[source]
        source: BoxError,
    },

    /// A schema statement failed; later statements were not run.
    #[error("{phase} (version {version})")]
    SchemaMigration {
        phase: SchemaPhase,
        version: u32,
        #[source]
        source: BoxError,
    },

    /// A unique key (alias or email) is already taken.
    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    /// The targeted record does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Input was rejected before reaching the backend.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The operation did not complete within its time budget.
    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    /// Any other backend failure.
    #[error("{operation}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn conflict(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            key: key.into(),
        }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn backend(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Backend {
            operation,
            source: source.into(),
        }
    }

    pub fn connection(context: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Connection {
            context,
            source: source.into(),
        }
    }

    /// Returns true for errors a caller can recover from per request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::NotFound { .. } | Self::Validation(_) | Self::Timeout { .. }
        )
    }
}
