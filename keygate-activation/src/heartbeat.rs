//! Heartbeat tracking and stale-slot reclamation.

use crate::config::ActivationConfig;
use crate::error::{ActivationError, ActivationResult};
use chrono::Duration as ChronoDuration;
use keygate_license::LicenseError;
use keygate_store::{with_deadline, ActivationStore, LicenseStore, LockRegistry};
use keygate_types::{ActivationStatus, Clock, LicenseCode, MachineFingerprint};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Acknowledgement of a heartbeat: the cadence for the next one.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatAck {
    /// How long the client should wait before the next heartbeat.
    pub next_interval: Duration,
}

/// Records liveness signals and reclaims slots whose clients went silent.
pub struct HeartbeatTracker {
    licenses: Arc<dyn LicenseStore>,
    activations: Arc<dyn ActivationStore>,
    locks: Arc<LockRegistry<LicenseCode>>,
    clock: Arc<dyn Clock>,
    config: ActivationConfig,
}

impl HeartbeatTracker {
    /// Creates a tracker. The lock registry must be the same one the
    /// activation manager uses — reclamation and activation serialize
    /// through it.
    pub fn new(
        licenses: Arc<dyn LicenseStore>,
        activations: Arc<dyn ActivationStore>,
        locks: Arc<LockRegistry<LicenseCode>>,
        clock: Arc<dyn Clock>,
        config: ActivationConfig,
    ) -> Self {
        Self {
            licenses,
            activations,
            locks,
            clock,
            config,
        }
    }

    /// Records a liveness signal for an active activation.
    ///
    /// `NotFound` when no matching active record exists — the signal for
    /// the client to re-activate (its slot may have been reclaimed).
    /// Revoked licenses are rejected so a revocation takes effect at the
    /// next heartbeat even on long-lived clients.
    pub async fn heartbeat(
        &self,
        code: &LicenseCode,
        fingerprint: &MachineFingerprint,
    ) -> ActivationResult<HeartbeatAck> {
        let license = with_deadline(self.config.store_deadline, self.licenses.get(code))
            .await?
            .ok_or(ActivationError::License(LicenseError::NotFound))?;
        if license.is_revoked() {
            return Err(ActivationError::License(LicenseError::Revoked));
        }

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

        activation.last_heartbeat = self.clock.now();
        with_deadline(self.config.store_deadline, self.activations.save(&activation)).await?;
        debug!("heartbeat from {fingerprint} on {code}");

        Ok(HeartbeatAck {
            next_interval: self.config.heartbeat_interval,
        })
    }

    /// Runs one reclamation pass: every active activation silent for
    /// longer than the stale window is transitioned to
    /// `expired_by_timeout`, freeing its slot.
    ///
    /// Each license's candidates are re-checked under that license's lock
    /// so a heartbeat racing the scan wins — a record refreshed between
    /// the scan and the lock is left alone. Per-record failures are
    /// logged and skipped; the next pass picks them up.
    pub async fn reclaim_stale(&self) -> ActivationResult<usize> {
        let stale_window =
            ChronoDuration::from_std(self.config.stale_after()).unwrap_or(ChronoDuration::MAX);
        let cutoff = self.clock.now() - stale_window;

        let candidates = with_deadline(
            self.config.store_deadline,
            self.activations.scan_stale(cutoff),
        )
        .await?;

        if candidates.is_empty() {
            return Ok(0);
        }

        // Group by license so each license's slots are swept under its own
        // critical section.
        let mut by_license: HashMap<LicenseCode, Vec<MachineFingerprint>> = HashMap::new();
        for activation in candidates {
            by_license
                .entry(activation.license_code)
                .or_default()
                .push(activation.fingerprint);
        }

        let mut reclaimed = 0;
        for (code, fingerprints) in by_license {
            let _guard = self.locks.acquire(&code).await;
            for fingerprint in fingerprints {
                match self.reclaim_one(&code, &fingerprint, cutoff).await {
                    Ok(true) => reclaimed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!("reclamation of {fingerprint} on {code} failed, will retry next pass: {e}");
                    }
                }
            }
        }

        if reclaimed > 0 {
            info!("reclaimed {reclaimed} stale activation(s)");
        }
        Ok(reclaimed)
    }

    /// Must be called with the per-license lock held. Returns true if the
    /// record was reclaimed, false if a concurrent heartbeat resurrected
    /// it (or it already left `active`).
    async fn reclaim_one(
        &self,
        code: &LicenseCode,
        fingerprint: &MachineFingerprint,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> ActivationResult<bool> {
        let activation = with_deadline(
            self.config.store_deadline,
            self.activations.find_by_fingerprint(code, fingerprint),
        )
        .await?;

        let Some(mut activation) = activation else {
            return Ok(false);
        };
        if !activation.is_active() || !activation.is_stale(cutoff) {
            return Ok(false);
        }

        activation.status = ActivationStatus::ExpiredByTimeout;
        with_deadline(self.config.store_deadline, self.activations.save(&activation)).await?;
        debug!("reclaimed {fingerprint} on {code} (last heartbeat {})", activation.last_heartbeat);
        Ok(true)
    }
}

impl std::fmt::Debug for HeartbeatTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatTracker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Spawns the background reclamation loop on the tokio runtime.
///
/// Failures are logged and retried on the next tick — reclamation is
/// best-effort and self-correcting. Dropping the handle aborts nothing;
/// call `abort()` on shutdown.
pub fn spawn_reclamation(tracker: Arc<HeartbeatTracker>) -> tokio::task::JoinHandle<()> {
    let period = tracker.config.reclaim_scan_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = tracker.reclaim_stale().await {
                warn!("reclamation pass failed, will retry next tick: {e}");
            }
        }
    })
}
