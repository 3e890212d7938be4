//! Stateless license validation.

use crate::claims::LicenseClaims;
use crate::code::validate_code_format;
use crate::error::{LicenseError, LicenseResult};
use keygate_crypto::{verify_detached, KeyError, Keyring};
use keygate_store::{with_deadline, LicenseStore};
use keygate_types::{Clock, License, LicenseCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Configuration for the validator.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Deadline applied to each store call.
    pub store_deadline: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            store_deadline: Duration::from_secs(5),
        }
    }
}

/// Verifies an incoming license code's signature, status, and expiry.
///
/// `validate` is read-only and side-effect-free; it consumes no activation
/// slot. Clients call it independently of activation, e.g. to pre-check a
/// license before binding a machine.
pub struct LicenseValidator {
    store: Arc<dyn LicenseStore>,
    keyring: Arc<Keyring>,
    clock: Arc<dyn Clock>,
    config: ValidatorConfig,
}

impl LicenseValidator {
    /// Creates a validator. A verify-only keyring is sufficient.
    pub fn new(
        store: Arc<dyn LicenseStore>,
        keyring: Arc<Keyring>,
        clock: Arc<dyn Clock>,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            store,
            keyring,
            clock,
            config,
        }
    }

    /// Validates a presented license.
    ///
    /// Check order: format precheck and store lookup (`NotFound`),
    /// signature over the canonical payload (`SignatureInvalid`), status
    /// (`Revoked`), expiry against the injected clock (`Expired`). The
    /// first failing check wins and its reason is returned as-is.
    pub async fn validate(
        &self,
        code: &LicenseCode,
        signature_b64: &str,
    ) -> LicenseResult<License> {
        if !validate_code_format(code.as_str()) {
            return Err(LicenseError::MalformedCode);
        }

        let license = with_deadline(self.config.store_deadline, self.store.get(code))
            .await?
            .ok_or(LicenseError::NotFound)?;

        let payload = LicenseClaims::from_license(&license).canonical_bytes()?;
        if let Err(e) = verify_detached(&self.keyring, &license.key_id, &payload, signature_b64) {
            return Err(match e {
                // Wrong key, tampered payload, or a garbage signature all
                // mean the grant cannot be trusted.
                KeyError::SignatureInvalid
                | KeyError::UnknownKeyId(_)
                | KeyError::MalformedEnvelope(_) => {
                    warn!("signature verification failed for license {code}: {e}");
                    LicenseError::SignatureInvalid
                }
                other => LicenseError::Key(other),
            });
        }

        if license.is_revoked() {
            return Err(LicenseError::Revoked);
        }

        let now = self.clock.now();
        if license.is_expired(now) {
            // is_expired is only true when expires_at is set
            let expired_at = license.expires_at.unwrap_or(now);
            return Err(LicenseError::Expired(expired_at));
        }

        Ok(license)
    }
}

impl std::fmt::Debug for LicenseValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseValidator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
