//! Key material and signing for the keygate licensing engine.
//!
//! This crate handles:
//! - The Ed25519 keyring: one active signing key, many verification keys
//!   indexed by key id (so key rotation never invalidates old licenses)
//! - The signed envelope wire format `base64url(payload).base64url(signature)`
//! - Argon2id password hashing for credential verification
//!
//! The signature always covers the base64url-encoded payload string, not
//! the decoded bytes, so verification is reproducible across
//! implementations that re-encode the payload.

mod envelope;
mod error;
mod keyring;
mod password;

pub use envelope::{sign_detached, verify_detached, SignedEnvelope};
pub use error::{KeyError, KeyResult};
pub use keyring::Keyring;
pub use password::{hash_password, verify_password};
