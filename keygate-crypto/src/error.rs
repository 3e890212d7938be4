//! Error types for key material operations.

use keygate_types::KeyId;
use thiserror::Error;

/// Errors from the keyring, envelope codec, and password hashing.
#[derive(Debug, Error)]
pub enum KeyError {
    /// No private key is loaded; signing is impossible. This indicates
    /// misconfiguration and is fatal at startup, not recoverable per-call.
    #[error("no signing key loaded")]
    KeyUnavailable,

    /// No verification key is registered under the given id.
    #[error("unknown key id: {0}")]
    UnknownKeyId(KeyId),

    /// Ed25519 signature verification failed.
    #[error("signature invalid")]
    SignatureInvalid,

    /// Key bytes were not valid Ed25519 key material.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The envelope string is not `base64url(payload).base64url(signature)`.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Password hashing or hash parsing failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),
}

/// Result type for key material operations.
pub type KeyResult<T> = Result<T, KeyError>;
