//! The License record: a signed grant of rights to a customer.

use crate::ids::{CustomerId, KeyId, LicenseCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The current status of a license.
///
/// Status is the only mutable field on a license; everything covered by
/// the signature is frozen at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    /// License is valid for activation and validation.
    Active,
    /// License was administratively revoked. Terminal.
    Revoked,
}

/// A license grant as held by the license store.
///
/// The signature covers the immutable fields (code, customer, issuance and
/// expiry timestamps, features, activation limit, key id) in their
/// canonical serialization. `status` and `version` are bookkeeping outside
/// the signed payload: flipping status cannot forge a grant, and editing a
/// signed field invalidates the signature by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Client-facing license code.
    pub code: LicenseCode,
    /// The customer this license was issued to.
    pub customer_id: CustomerId,
    /// Issuance timestamp.
    pub issued_at: DateTime<Utc>,
    /// Expiry timestamp; `None` means perpetual.
    pub expires_at: Option<DateTime<Utc>>,
    /// Feature flags granted by this license. Ordered set so the canonical
    /// payload is reproducible.
    pub features: BTreeSet<String>,
    /// Maximum number of concurrently active machine activations.
    pub max_activations: u32,
    /// Current status.
    pub status: LicenseStatus,
    /// Key generation the signature was produced under.
    pub key_id: KeyId,
    /// Detached signature over the canonical payload, base64url encoded.
    pub signature: String,
    /// Optimistic-concurrency version counter, incremented on every save.
    pub version: u64,
}

impl License {
    /// Returns true if the license is past its expiry at the given instant.
    /// Perpetual licenses never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }

    /// Returns true if the license has been revoked.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.status == LicenseStatus::Revoked
    }

    /// Returns true if the named feature is granted.
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }
}
