//! The Ed25519 keyring: one active signing key, many verification keys.
//!
//! Rotation model: generating a new pair adds a new key id; the old
//! verification keys stay registered so licenses and tokens signed under
//! them keep verifying. Signing always uses the single active key. The
//! keyring is immutable after construction and safely shared across
//! concurrent sign/verify calls.

use crate::error::{KeyError, KeyResult};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use keygate_types::KeyId;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use zeroize::Zeroizing;

/// Holds the server's signing key and every verification key that has
/// ever been valid, indexed by key id.
pub struct Keyring {
    active: Option<(KeyId, SigningKey)>,
    verifiers: HashMap<KeyId, VerifyingKey>,
}

impl Keyring {
    /// Generates a fresh signing key with an id derived from the public
    /// key (first 8 bytes of its SHA-256, hex).
    #[must_use]
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let id = derive_key_id(&signing_key.verifying_key());
        Self::from_signing_key(id, signing_key)
    }

    /// Builds a keyring from a 32-byte seed under the given key id.
    /// Deterministic; used for startup from configured key material and
    /// for test fixtures.
    #[must_use]
    pub fn from_seed(id: KeyId, seed: &[u8; 32]) -> Self {
        Self::from_signing_key(id, SigningKey::from_bytes(seed))
    }

    /// Builds a keyring from a hex-encoded 32-byte seed, the form key
    /// material arrives in from configuration or an environment variable.
    /// The intermediate seed buffer is zeroized.
    pub fn from_seed_hex(id: KeyId, hex: &str) -> KeyResult<Self> {
        let hex = hex.trim();
        if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(KeyError::InvalidKeyMaterial(
                "expected 64 hex characters (32-byte seed)".to_string(),
            ));
        }
        let mut seed = Zeroizing::new([0u8; 32]);
        for (i, byte) in seed.iter_mut().enumerate() {
            // Length and charset were checked above.
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|e| KeyError::InvalidKeyMaterial(e.to_string()))?;
        }
        Ok(Self::from_seed(id, &seed))
    }

    fn from_signing_key(id: KeyId, signing_key: SigningKey) -> Self {
        let mut verifiers = HashMap::new();
        verifiers.insert(id.clone(), signing_key.verifying_key());
        Self {
            active: Some((id, signing_key)),
            verifiers,
        }
    }

    /// Builds a verify-only keyring. Signing through it fails with
    /// [`KeyError::KeyUnavailable`].
    pub fn verify_only(
        keys: impl IntoIterator<Item = (KeyId, [u8; 32])>,
    ) -> KeyResult<Self> {
        let mut verifiers = HashMap::new();
        for (id, bytes) in keys {
            let key = VerifyingKey::from_bytes(&bytes)
                .map_err(|e| KeyError::InvalidKeyMaterial(format!("key {id}: {e}")))?;
            verifiers.insert(id, key);
        }
        Ok(Self {
            active: None,
            verifiers,
        })
    }

    /// Registers a retired verification key so material signed under it
    /// keeps verifying after rotation.
    pub fn with_retired_key(mut self, id: KeyId, public_key: [u8; 32]) -> KeyResult<Self> {
        let key = VerifyingKey::from_bytes(&public_key)
            .map_err(|e| KeyError::InvalidKeyMaterial(format!("key {id}: {e}")))?;
        self.verifiers.insert(id, key);
        Ok(self)
    }

    /// Returns the id of the active signing key.
    pub fn active_key_id(&self) -> KeyResult<&KeyId> {
        self.active
            .as_ref()
            .map(|(id, _)| id)
            .ok_or(KeyError::KeyUnavailable)
    }

    /// Returns true if this keyring can sign.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.active.is_some()
    }

    /// Signs a payload with the active private key.
    pub fn sign(&self, payload: &[u8]) -> KeyResult<(KeyId, Signature)> {
        let (id, key) = self.active.as_ref().ok_or(KeyError::KeyUnavailable)?;
        Ok((id.clone(), key.sign(payload)))
    }

    /// Verifies a signature against the verification key registered under
    /// `key_id`.
    pub fn verify(&self, key_id: &KeyId, payload: &[u8], signature: &Signature) -> KeyResult<()> {
        let key = self
            .verifiers
            .get(key_id)
            .ok_or_else(|| KeyError::UnknownKeyId(key_id.clone()))?;
        key.verify(payload, signature)
            .map_err(|_| KeyError::SignatureInvalid)
    }

    /// Returns the raw verification key bytes for distribution to clients,
    /// if a key is registered under `key_id`.
    #[must_use]
    pub fn verifying_key_bytes(&self, key_id: &KeyId) -> Option<[u8; 32]> {
        self.verifiers.get(key_id).map(|k| k.to_bytes())
    }

    /// Returns every registered key id.
    #[must_use]
    pub fn key_ids(&self) -> Vec<KeyId> {
        self.verifiers.keys().cloned().collect()
    }
}

impl std::fmt::Debug for Keyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyring")
            .field("active", &self.active.as_ref().map(|(id, _)| id))
            .field("verifiers", &self.verifiers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Derives a key id from a verification key: first 8 bytes of its
/// SHA-256, hex encoded.
fn derive_key_id(key: &VerifyingKey) -> KeyId {
    let mut hasher = Sha256::new();
    hasher.update(key.to_bytes());
    let hash = hasher.finalize();
    let hex: String = hash[..8].iter().map(|b| format!("{b:02x}")).collect();
    KeyId::new(hex)
}
