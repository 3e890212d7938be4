//! Error types for activation operations.

use keygate_license::LicenseError;
use keygate_store::StoreError;
use thiserror::Error;

/// Activation and heartbeat errors.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// No matching active activation for this license and fingerprint.
    /// The client should re-activate.
    #[error("no matching active activation")]
    NotFound,

    /// Every slot is taken by another machine. The caller may prompt for
    /// a manual deactivation elsewhere; retrying will not help.
    #[error("activation limit exceeded (max {max} concurrent activations)")]
    LimitExceeded {
        /// The license's concurrent-activation limit.
        max: u32,
    },

    /// The underlying license failed validation (not found, bad
    /// signature, revoked, expired). The reason carries through intact.
    #[error("license check failed: {0}")]
    License(#[from] LicenseError),

    /// Store failure (retryable variants carry through).
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for activation operations.
pub type ActivationResult<T> = Result<T, ActivationError>;
