//! The signed envelope wire format: `base64url(payload).base64url(signature)`.
//!
//! The signature covers `payload_b64.as_bytes()` — the base64url-encoded
//! payload string, not the decoded JSON. Session tokens travel as whole
//! envelopes; license signatures travel detached (the client presents the
//! license code and the signature, the server reconstructs the payload).

use crate::error::{KeyError, KeyResult};
use crate::keyring::Keyring;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::Signature;
use keygate_types::KeyId;

/// A parsed two-part envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    payload_b64: String,
    signature_b64: String,
}

impl SignedEnvelope {
    /// Encodes and signs a payload with the keyring's active key.
    pub fn seal(keyring: &Keyring, payload: &[u8]) -> KeyResult<(Self, KeyId)> {
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let (key_id, signature) = keyring.sign(payload_b64.as_bytes())?;
        Ok((
            Self {
                payload_b64,
                signature_b64: URL_SAFE_NO_PAD.encode(signature.to_bytes()),
            },
            key_id,
        ))
    }

    /// Splits an envelope string into its parts. Does not verify anything.
    pub fn parse(envelope: &str) -> KeyResult<Self> {
        let envelope = envelope.trim();
        let parts: Vec<&str> = envelope.split('.').collect();
        if parts.len() != 2 {
            return Err(KeyError::MalformedEnvelope(
                "envelope must have exactly two parts separated by a dot".to_string(),
            ));
        }
        Ok(Self {
            payload_b64: parts[0].to_string(),
            signature_b64: parts[1].to_string(),
        })
    }

    /// Decodes the payload bytes.
    pub fn payload(&self) -> KeyResult<Vec<u8>> {
        URL_SAFE_NO_PAD
            .decode(&self.payload_b64)
            .map_err(|e| KeyError::MalformedEnvelope(format!("invalid payload base64: {e}")))
    }

    /// Verifies the signature under the given key id.
    pub fn verify(&self, keyring: &Keyring, key_id: &KeyId) -> KeyResult<()> {
        let signature = decode_signature(&self.signature_b64)?;
        keyring.verify(key_id, self.payload_b64.as_bytes(), &signature)
    }

    /// Renders the envelope as its wire string.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}.{}", self.payload_b64, self.signature_b64)
    }
}

/// Signs a payload and returns the base64url-encoded detached signature
/// alongside the id of the key that produced it.
pub fn sign_detached(keyring: &Keyring, payload: &[u8]) -> KeyResult<(KeyId, String)> {
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
    let (key_id, signature) = keyring.sign(payload_b64.as_bytes())?;
    Ok((key_id, URL_SAFE_NO_PAD.encode(signature.to_bytes())))
}

/// Verifies a detached base64url signature over a payload.
pub fn verify_detached(
    keyring: &Keyring,
    key_id: &KeyId,
    payload: &[u8],
    signature_b64: &str,
) -> KeyResult<()> {
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
    let signature = decode_signature(signature_b64)?;
    keyring.verify(key_id, payload_b64.as_bytes(), &signature)
}

fn decode_signature(signature_b64: &str) -> KeyResult<Signature> {
    let bytes = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| KeyError::MalformedEnvelope(format!("invalid signature base64: {e}")))?;
    Signature::from_slice(&bytes)
        .map_err(|_| KeyError::MalformedEnvelope("invalid signature length".to_string()))
}
