//! Error types for license operations.
//!
//! Every validation failure keeps its distinct reason — clients renew on
//! `Expired`, re-provision on `NotFound`, and treat `SignatureInvalid` as
//! tampering; collapsing them would break all three reactions.

use chrono::{DateTime, Utc};
use keygate_crypto::KeyError;
use keygate_store::StoreError;
use thiserror::Error;

/// License issuance and validation errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// No license exists under this code.
    #[error("license not found")]
    NotFound,

    /// The code does not match the `LIC-XXXX-XXXXXXXXXXXX-XXXX` format
    /// (rejected before any store lookup).
    #[error("malformed license code")]
    MalformedCode,

    /// Signature verification failed: tampering or a wrong key. Never
    /// retried; logged as a security event.
    #[error("license signature invalid")]
    SignatureInvalid,

    /// The license is past its expiry.
    #[error("license expired at {0}")]
    Expired(DateTime<Utc>),

    /// The license was administratively revoked.
    #[error("license has been revoked")]
    Revoked,

    /// Issuance was asked for a zero activation limit.
    #[error("max_activations must be positive")]
    ZeroActivationLimit,

    /// Code generation kept colliding with existing licenses.
    #[error("could not generate an unused license code after {0} attempts")]
    CodeGeneration(u32),

    /// Store failure (retryable variants carry through).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Key material failure (signing without a private key, bad key bytes).
    #[error("key error: {0}")]
    Key(KeyError),

    /// Canonical payload serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
