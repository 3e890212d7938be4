//! Argon2id password hashing for credential verification.

use crate::error::{KeyError, KeyResult};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hashes a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> KeyResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| KeyError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a password against a PHC hash string.
///
/// Returns `Ok(false)` on a mismatch; an error only if the stored hash
/// itself cannot be parsed.
pub fn verify_password(password: &str, phc_hash: &str) -> KeyResult<bool> {
    let parsed = PasswordHash::new(phc_hash)
        .map_err(|e| KeyError::PasswordHash(format!("stored hash unparseable: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
