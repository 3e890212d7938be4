//! Error types for authentication and token validation.
//!
//! Token failures stay distinct — `TokenExpired` sends a client into the
//! refresh flow, `TokenMalformed` does not, and `TokenRevoked` means the
//! session was ended on purpose.

use chrono::{DateTime, Utc};
use keygate_crypto::KeyError;
use keygate_store::StoreError;
use thiserror::Error;

/// Authentication and session errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown principal or wrong password. Deliberately one variant —
    /// callers cannot probe which half failed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account is administratively disabled.
    #[error("account disabled")]
    Disabled,

    /// The principal is in its lockout window. Back off until `until`.
    #[error("account locked until {until}")]
    LockedOut {
        /// When the lockout window ends.
        until: DateTime<Utc>,
    },

    /// The token is past its expiry; the caller should refresh.
    #[error("token expired")]
    TokenExpired,

    /// The token cannot be parsed into an envelope and claims.
    #[error("token malformed")]
    TokenMalformed,

    /// The token's signature does not verify — tampering or a wrong key.
    #[error("token signature invalid")]
    TokenSignatureInvalid,

    /// The token id is on the deny-list (logged out or force-revoked).
    #[error("token revoked")]
    TokenRevoked,

    /// The token is valid but outside the refresh-eligible window.
    #[error("token not yet eligible for refresh")]
    NotRefreshable,

    /// Store failure (retryable variants carry through).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Key material failure (signing without a private key).
    #[error("key error: {0}")]
    Key(KeyError),

    /// Claims serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
