//! Tunables for activation and reclamation.

use std::time::Duration;

/// Configuration shared by the activation manager and heartbeat tracker.
#[derive(Debug, Clone)]
pub struct ActivationConfig {
    /// Cadence clients are told to heartbeat at.
    pub heartbeat_interval: Duration,
    /// An activation is reclaimable after
    /// `heartbeat_interval × reclaim_timeout_multiple` of silence.
    pub reclaim_timeout_multiple: u32,
    /// How often the background reclamation pass runs.
    pub reclaim_scan_interval: Duration,
    /// Deadline applied to each store call.
    pub store_deadline: Duration,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(300),
            reclaim_timeout_multiple: 3,
            reclaim_scan_interval: Duration::from_secs(300),
            store_deadline: Duration::from_secs(5),
        }
    }
}

impl ActivationConfig {
    /// The silence window after which an activation is considered stale.
    #[must_use]
    pub fn stale_after(&self) -> Duration {
        self.heartbeat_interval * self.reclaim_timeout_multiple
    }
}
