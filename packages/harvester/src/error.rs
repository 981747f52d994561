//! Typed errors for the harvesting pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Each error maps to a
//! closed-list [`ErrorKind`] that is safe to report upward; raw transport
//! and driver detail is logged where it occurs and never carried in the
//! error value.

use std::time::Duration;

use research_pool::PoolError;
use thiserror::Error;

/// Closed allow-list of error kinds reported in pipeline results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    SourceTransient,
    RateLimited,
    SourceAuth,
    LlmParse,
    LlmTransport,
    Storage,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::SourceTransient => "source_transient",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::SourceAuth => "source_auth",
            ErrorKind::LlmParse => "llm_parse",
            ErrorKind::LlmTransport => "llm_transport",
            ErrorKind::Storage => "storage",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

/// Errors surfaced by pipeline stages.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Input failed validation (bad config, invalid normalized item).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transient upstream failure; a retry may succeed.
    #[error("transient source error: {0}")]
    SourceTransient(String),

    /// Upstream or local rate limiter rejected the call.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Credentials rejected; fatal for the source this cycle.
    #[error("source authentication failed: {0}")]
    SourceAuth(String),

    /// Model output could not be parsed.
    #[error("failed to parse model output: {0}")]
    LlmParse(String),

    /// Model endpoint unavailable.
    #[error("model transport error: {0}")]
    LlmTransport(String),

    /// Pool operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] PoolError),

    /// The cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,
}

impl HarvestError {
    /// The closed-list kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarvestError::Validation(_) => ErrorKind::Validation,
            HarvestError::SourceTransient(_) => ErrorKind::SourceTransient,
            HarvestError::RateLimited { .. } => ErrorKind::RateLimited,
            HarvestError::SourceAuth(_) => ErrorKind::SourceAuth,
            HarvestError::LlmParse(_) => ErrorKind::LlmParse,
            HarvestError::LlmTransport(_) => ErrorKind::LlmTransport,
            HarvestError::Storage(_) => ErrorKind::Storage,
            HarvestError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Short description safe to include in user-visible results.
    pub fn safe_description(&self) -> String {
        format!("{}: {}", self.kind().as_str(), self)
    }
}

/// Errors returned by upstream source clients.
///
/// Clients classify their failures; the pipeline maps them onto the
/// [`HarvestError`] taxonomy.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Timeout, 5xx, connection reset; safe to retry.
    #[error("transient error: {0}")]
    Transient(String),

    /// Explicit rate-limit response, optionally with a retry hint.
    #[error("rate limited by source")]
    RateLimited { retry_after: Option<Duration> },

    /// Credentials invalid or expired.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Request is never going to succeed (4xx other than auth/429).
    #[error("permanent error: {0}")]
    Permanent(String),
}

/// Fallback retry hint when the source gives none.
pub(crate) const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

impl From<SourceError> for HarvestError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Transient(msg) => HarvestError::SourceTransient(msg),
            SourceError::RateLimited { retry_after } => HarvestError::RateLimited {
                retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER),
            },
            SourceError::Auth(msg) => HarvestError::SourceAuth(msg),
            SourceError::Permanent(msg) => HarvestError::SourceTransient(msg),
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, HarvestError>;
