//! The canonical signed payload of a license.

use keygate_types::{CustomerId, KeyId, License, LicenseCode};
use serde::{Deserialize, Serialize};

/// The immutable license fields in their canonical serialization order.
///
/// Canonical rules: fields serialize in declaration order, timestamps are
/// Unix seconds, a perpetual license carries an explicit `"expires_at": null`,
/// and features are sorted. Reconstructing this struct from a stored
/// license and serializing it yields byte-identical payloads across
/// implementations, which is what makes verification reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseClaims {
    /// License code.
    pub code: LicenseCode,
    /// Customer the grant belongs to.
    pub customer_id: CustomerId,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds; `null` for perpetual.
    pub exp: Option<i64>,
    /// Sorted feature flags.
    pub features: Vec<String>,
    /// Concurrent activation limit.
    pub max_activations: u32,
    /// Key generation the signature is made under.
    pub kid: KeyId,
}

impl LicenseClaims {
    /// Rebuilds the canonical claims from a stored license.
    #[must_use]
    pub fn from_license(license: &License) -> Self {
        Self {
            code: license.code.clone(),
            customer_id: license.customer_id,
            iat: license.issued_at.timestamp(),
            exp: license.expires_at.map(|t| t.timestamp()),
            features: license.features.iter().cloned().collect(),
            max_activations: license.max_activations,
            kid: license.key_id.clone(),
        }
    }

    /// Serializes the canonical payload bytes that get signed.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
