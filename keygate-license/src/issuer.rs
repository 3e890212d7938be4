//! License issuance and revocation.

use crate::claims::LicenseClaims;
use crate::code::generate_code;
use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, Utc};
use keygate_crypto::{sign_detached, Keyring};
use keygate_store::{with_deadline, LicenseStore, StoreError};
use keygate_types::{Clock, CustomerId, License, LicenseCode, LicenseStatus};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the issuer.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// How many fresh codes to try before giving up on a collision storm.
    pub max_code_attempts: u32,
    /// Deadline applied to each store call.
    pub store_deadline: Duration,
    /// How many times a revoke retries a conflicted save before surfacing
    /// the conflict.
    pub max_save_retries: u32,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            max_code_attempts: 8,
            store_deadline: Duration::from_secs(5),
            max_save_retries: 3,
        }
    }
}

/// Builds and signs license records.
pub struct LicenseIssuer {
    store: Arc<dyn LicenseStore>,
    keyring: Arc<Keyring>,
    clock: Arc<dyn Clock>,
    config: IssuerConfig,
}

impl LicenseIssuer {
    /// Creates an issuer. The keyring must hold a private key; a
    /// verify-only keyring makes every `issue` fail with a key error.
    pub fn new(
        store: Arc<dyn LicenseStore>,
        keyring: Arc<Keyring>,
        clock: Arc<dyn Clock>,
        config: IssuerConfig,
    ) -> Self {
        Self {
            store,
            keyring,
            clock,
            config,
        }
    }

    /// Issues a signed license to a customer.
    ///
    /// The code is collision-checked against the store and regenerated on
    /// collision — an existing license is never overwritten. The signature
    /// covers the canonical payload of the immutable fields.
    pub async fn issue(
        &self,
        customer_id: CustomerId,
        expires_at: Option<DateTime<Utc>>,
        features: BTreeSet<String>,
        max_activations: u32,
    ) -> LicenseResult<License> {
        if max_activations == 0 {
            return Err(LicenseError::ZeroActivationLimit);
        }

        for attempt in 0..self.config.max_code_attempts {
            let code = generate_code(&customer_id);

            let existing =
                with_deadline(self.config.store_deadline, self.store.get(&code)).await?;
            if existing.is_some() {
                debug!("license code collision on attempt {attempt}, regenerating");
                continue;
            }

            let license = self.build_signed(code, customer_id, expires_at, &features, max_activations)?;

            match with_deadline(self.config.store_deadline, self.store.save(&license)).await {
                Ok(()) => {
                    info!(
                        "issued license {} for customer {} (max_activations={})",
                        license.code, customer_id, max_activations
                    );
                    return Ok(license);
                }
                // Another issue call claimed this code between our get and
                // save; pick a new code.
                Err(StoreError::VersionConflict) => {
                    debug!("license code claimed concurrently on attempt {attempt}, regenerating");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(LicenseError::CodeGeneration(self.config.max_code_attempts))
    }

    fn build_signed(
        &self,
        code: LicenseCode,
        customer_id: CustomerId,
        expires_at: Option<DateTime<Utc>>,
        features: &BTreeSet<String>,
        max_activations: u32,
    ) -> LicenseResult<License> {
        let key_id = self
            .keyring
            .active_key_id()
            .map_err(LicenseError::Key)?
            .clone();

        let mut license = License {
            code,
            customer_id,
            issued_at: self.clock.now(),
            expires_at,
            features: features.clone(),
            max_activations,
            status: LicenseStatus::Active,
            key_id,
            signature: String::new(),
            version: 0,
        };

        let payload = LicenseClaims::from_license(&license).canonical_bytes()?;
        let (_, signature) = sign_detached(&self.keyring, &payload).map_err(LicenseError::Key)?;
        license.signature = signature;
        Ok(license)
    }

    /// Revokes a license. Idempotent: revoking an already-revoked license
    /// is a no-op success. `NotFound` if no such license exists.
    pub async fn revoke(&self, code: &LicenseCode) -> LicenseResult<()> {
        for _ in 0..=self.config.max_save_retries {
            let license = with_deadline(self.config.store_deadline, self.store.get(code))
                .await?
                .ok_or(LicenseError::NotFound)?;

            if license.is_revoked() {
                return Ok(());
            }

            let mut revoked = license;
            revoked.status = LicenseStatus::Revoked;

            match with_deadline(self.config.store_deadline, self.store.save(&revoked)).await {
                Ok(()) => {
                    warn!("license {code} revoked");
                    return Ok(());
                }
                // Concurrent mutation (possibly another revoke); re-read
                // and re-check.
                Err(StoreError::VersionConflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(LicenseError::Store(StoreError::VersionConflict))
    }
}

impl std::fmt::Debug for LicenseIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseIssuer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
