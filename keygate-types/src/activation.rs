//! The Activation record: a license bound to one machine fingerprint.

use crate::ids::{ActivationId, LicenseCode, MachineFingerprint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The current status of an activation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    /// Slot is held by a live client.
    Active,
    /// Reclaimed after the client stopped heartbeating. The slot is free.
    ExpiredByTimeout,
    /// Explicitly released by the client. The slot is free.
    Deactivated,
}

/// One consumed concurrency slot: the binding of a license to a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    /// Unique identifier for this activation.
    pub id: ActivationId,
    /// The license this activation draws a slot from.
    pub license_code: LicenseCode,
    /// The machine holding the slot.
    pub fingerprint: MachineFingerprint,
    /// When the slot was (most recently) claimed.
    pub activated_at: DateTime<Utc>,
    /// Last liveness signal from the client.
    pub last_heartbeat: DateTime<Utc>,
    /// Current status.
    pub status: ActivationStatus,
    /// Optimistic-concurrency version counter, incremented on every save.
    pub version: u64,
}

impl Activation {
    /// Returns true if this activation currently holds a slot.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ActivationStatus::Active
    }

    /// Returns true if the last heartbeat is older than `cutoff`.
    #[must_use]
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_heartbeat < cutoff
    }
}
