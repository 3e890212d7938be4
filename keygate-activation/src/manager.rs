//! The activation manager: binds licenses to machines under the
//! per-license critical section.

use crate::config::ActivationConfig;
use crate::error::{ActivationError, ActivationResult};
use keygate_license::LicenseValidator;
use keygate_store::{with_deadline, ActivationStore, LockRegistry};
use keygate_types::{
    Activation, ActivationId, ActivationStatus, Clock, LicenseCode, MachineFingerprint,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A successful activation: the record plus the heartbeat cadence the
/// client must honor to keep its slot.
#[derive(Debug, Clone)]
pub struct ActivationGrant {
    /// The activation record holding the slot.
    pub activation: Activation,
    /// How often the client must heartbeat.
    pub heartbeat_interval: Duration,
}

/// Enforces the max-concurrent-activation invariant.
pub struct ActivationManager {
    validator: Arc<LicenseValidator>,
    activations: Arc<dyn ActivationStore>,
    locks: Arc<LockRegistry<LicenseCode>>,
    clock: Arc<dyn Clock>,
    config: ActivationConfig,
}

impl ActivationManager {
    /// Creates a manager. The lock registry must be shared with the
    /// heartbeat tracker so reclamation serializes against activation.
    pub fn new(
        validator: Arc<LicenseValidator>,
        activations: Arc<dyn ActivationStore>,
        locks: Arc<LockRegistry<LicenseCode>>,
        clock: Arc<dyn Clock>,
        config: ActivationConfig,
    ) -> Self {
        Self {
            validator,
            activations,
            locks,
            clock,
            config,
        }
    }

    /// Activates a license on a machine, consuming one slot.
    ///
    /// Runs the full validator first, then claims a slot under the
    /// per-license critical section. Re-activating a fingerprint that
    /// already holds a slot is idempotent: timestamps are refreshed and
    /// the existing record returned without consuming anything — clients
    /// retry activation after crashes and perceived timeouts and must not
    /// be double-charged against the limit.
    pub async fn activate(
        &self,
        code: &LicenseCode,
        signature_b64: &str,
        fingerprint: &MachineFingerprint,
    ) -> ActivationResult<ActivationGrant> {
        let license = self.validator.validate(code, signature_b64).await?;

        let _guard = self.locks.acquire(code).await;
        let now = self.clock.now();

        let existing = with_deadline(
            self.config.store_deadline,
            self.activations.find_by_fingerprint(code, fingerprint),
        )
        .await?;

        if let Some(mut activation) = existing {
            if activation.is_active() {
                // Idempotent re-activation: same identity, no new slot.
                activation.activated_at = now;
                activation.last_heartbeat = now;
                with_deadline(self.config.store_deadline, self.activations.save(&activation))
                    .await?;
                debug!("re-activated {fingerprint} on {code} (idempotent)");
                return Ok(self.grant(activation));
            }

            // A terminal record for this machine exists; rebinding
            // consumes a fresh slot, so it goes through the limit check.
            self.check_slot_available(code, license.max_activations).await?;
            activation.status = ActivationStatus::Active;
            activation.activated_at = now;
            activation.last_heartbeat = now;
            with_deadline(self.config.store_deadline, self.activations.save(&activation))
                .await?;
            info!("re-bound {fingerprint} on {code}");
            return Ok(self.grant(activation));
        }

        self.check_slot_available(code, license.max_activations).await?;

        let activation = Activation {
            id: ActivationId::new(),
            license_code: code.clone(),
            fingerprint: fingerprint.clone(),
            activated_at: now,
            last_heartbeat: now,
            status: ActivationStatus::Active,
            version: 0,
        };
        with_deadline(self.config.store_deadline, self.activations.save(&activation)).await?;
        info!("activated {fingerprint} on {code}");
        Ok(self.grant(activation))
    }

    /// Releases the slot held by a machine. `NotFound` if no matching
    /// active activation exists.
    pub async fn deactivate(
        &self,
        code: &LicenseCode,
        fingerprint: &MachineFingerprint,
    ) -> ActivationResult<()> {
        let _guard = self.locks.acquire(code).await;

        let activation = with_deadline(
            self.config.store_deadline,
            self.activations.find_by_fingerprint(code, fingerprint),
        )
        .await?;

        let Some(mut activation) = activation else {
            return Err(ActivationError::NotFound);
        };
        if !activation.is_active() {
            return Err(ActivationError::NotFound);
        }

        activation.status = ActivationStatus::Deactivated;
        with_deadline(self.config.store_deadline, self.activations.save(&activation)).await?;
        info!("deactivated {fingerprint} on {code}");
        Ok(())
    }

    /// Must be called with the per-license lock held.
    async fn check_slot_available(&self, code: &LicenseCode, max: u32) -> ActivationResult<()> {
        let count =
            with_deadline(self.config.store_deadline, self.activations.count_active(code)).await?;
        if count >= max {
            debug!("activation limit hit on {code}: {count}/{max}");
            return Err(ActivationError::LimitExceeded { max });
        }
        Ok(())
    }

    fn grant(&self, mut activation: Activation) -> ActivationGrant {
        // The save incremented the stored version; return the record as
        // the store now holds it.
        activation.version += 1;
        ActivationGrant {
            activation,
            heartbeat_interval: self.config.heartbeat_interval,
        }
    }
}

impl std::fmt::Debug for ActivationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
