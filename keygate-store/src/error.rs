//! Error types for store operations.

use thiserror::Error;

/// Errors surfaced by store implementations.
///
/// `VersionConflict` and `Timeout` are infrastructure-level and safe to
/// retry with backoff; engines keep them distinct from business
/// rejections so callers can tell the difference.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record was modified since it was read; re-read and retry.
    #[error("version conflict: record was modified concurrently")]
    VersionConflict,

    /// The store call did not complete within the caller's deadline.
    #[error("store operation timed out")]
    Timeout,

    /// Backend-specific failure (connection, query, serialization).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if the operation may be retried safely.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict | Self::Timeout)
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
