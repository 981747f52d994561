//! Typed errors for the Research Pool.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Storage errors carry
//! only a scrubbed description; the underlying driver error is logged at the
//! point of failure and never surfaced to callers.

use thiserror::Error;
use uuid::Uuid;

/// Closed list of error kinds safe to report to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl PoolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolErrorKind::Validation => "validation",
            PoolErrorKind::NotFound => "not_found",
            PoolErrorKind::Storage => "storage",
        }
    }
}

/// Errors surfaced by pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Input failed a schema or business rule check.
    #[error("validation failed for '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    /// A targeted operation referenced an absent item.
    #[error("research item not found: {id}")]
    NotFound { id: Uuid },

    /// A storage operation failed. `error_type` is drawn from a closed
    /// allow-list; raw driver detail is logged, never exposed.
    #[error("storage operation failed: {operation} ({error_type})")]
    Storage {
        operation: &'static str,
        error_type: &'static str,
    },
}

/// Storage error types that are safe to expose.
const SAFE_ERROR_TYPES: [&str; 4] = [
    "IntegrityError",
    "ConnectionError",
    "TimeoutError",
    "StorageError",
];

impl PoolError {
    /// Build a validation error.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        PoolError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Build a storage error from an underlying failure, logging the raw
    /// detail and keeping only a safe type tag.
    pub fn storage(
        operation: &'static str,
        error_type: &'static str,
        source: &dyn std::fmt::Display,
    ) -> Self {
        tracing::error!("storage operation '{}' failed: {}", operation, source);
        let error_type = if SAFE_ERROR_TYPES.contains(&error_type) {
            error_type
        } else {
            "StorageError"
        };
        PoolError::Storage {
            operation,
            error_type,
        }
    }

    /// The closed-list kind of this error.
    pub fn kind(&self) -> PoolErrorKind {
        match self {
            PoolError::Validation { .. } => PoolErrorKind::Validation,
            PoolError::NotFound { .. } => PoolErrorKind::NotFound,
            PoolError::Storage { .. } => PoolErrorKind::Storage,
        }
    }
}

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_scrubs_unknown_types() {
        let err = PoolError::storage("add", "PgDriverPanic", &"raw driver detail");
        match err {
            PoolError::Storage { error_type, .. } => assert_eq!(error_type, "StorageError"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn storage_error_keeps_safe_types() {
        let err = PoolError::storage("add", "IntegrityError", &"duplicate key");
        match err {
            PoolError::Storage { error_type, .. } => assert_eq!(error_type, "IntegrityError"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn kinds_are_stable() {
        let id = Uuid::new_v4();
        assert_eq!(
            PoolError::NotFound { id }.kind().as_str(),
            "not_found"
        );
        assert_eq!(
            PoolError::validation("url", "bad scheme").kind(),
            PoolErrorKind::Validation
        );
    }
}
