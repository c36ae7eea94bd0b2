//! Error types for cargotrack.
//!
//! All errors are strongly typed using thiserror so callers can match on
//! specific failure conditions.

use thiserror::Error;

use crate::storage::StorageError;

/// Top-level error type returned by the tracking engine.
///
/// Only report computation surfaces errors; event ingestion acknowledges
/// every call and reports failures through
/// [`IngestOutcome`](crate::engine::IngestOutcome) instead.
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Operation '{operation}' was cancelled")]
    Cancelled {
        operation: &'static str,
    },
}

impl TrackingError {
    /// Creates a cancellation error for the named operation.
    #[must_use]
    pub const fn cancelled(operation: &'static str) -> Self {
        Self::Cancelled { operation }
    }

    /// Returns true if this is a storage error.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if the caller cancelled the operation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result type alias for engine operations.
pub type TrackingResult<T> = Result<T, TrackingError>;
