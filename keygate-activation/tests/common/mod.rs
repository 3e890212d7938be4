//! Shared test fixture: a full activation stack over in-memory stores
//! and a manually driven clock.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use keygate_activation::{ActivationConfig, ActivationManager, HeartbeatTracker};
use keygate_crypto::Keyring;
use keygate_license::{IssuerConfig, LicenseIssuer, LicenseValidator, ValidatorConfig};
use keygate_store::{LockRegistry, MemoryActivationStore, MemoryLicenseStore};
use keygate_types::{CustomerId, KeyId, License, LicenseCode, ManualClock};
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct Fixture {
    pub licenses: Arc<MemoryLicenseStore>,
    pub activations: Arc<MemoryActivationStore>,
    pub clock: Arc<ManualClock>,
    pub issuer: LicenseIssuer,
    pub manager: Arc<ActivationManager>,
    pub tracker: Arc<HeartbeatTracker>,
    pub config: ActivationConfig,
}

pub fn fixture() -> Fixture {
    fixture_with(ActivationConfig::default())
}

pub fn fixture_with(config: ActivationConfig) -> Fixture {
    let seed: [u8; 32] = [7; 32];
    let keyring = Arc::new(Keyring::from_seed(KeyId::new("k1"), &seed));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ));
    let licenses = Arc::new(MemoryLicenseStore::new());
    let activations = Arc::new(MemoryActivationStore::new());
    let locks = Arc::new(LockRegistry::new());

    let issuer = LicenseIssuer::new(
        licenses.clone(),
        keyring.clone(),
        clock.clone(),
        IssuerConfig::default(),
    );
    let validator = Arc::new(LicenseValidator::new(
        licenses.clone(),
        keyring.clone(),
        clock.clone(),
        ValidatorConfig::default(),
    ));
    let manager = Arc::new(ActivationManager::new(
        validator,
        activations.clone(),
        locks.clone(),
        clock.clone(),
        config.clone(),
    ));
    let tracker = Arc::new(HeartbeatTracker::new(
        licenses.clone(),
        activations.clone(),
        locks,
        clock.clone(),
        config.clone(),
    ));

    Fixture {
        licenses,
        activations,
        clock,
        issuer,
        manager,
        tracker,
        config,
    }
}

impl Fixture {
    /// Issues a perpetual license with the given activation limit.
    pub async fn issue(&self, max_activations: u32) -> License {
        self.issuer
            .issue(CustomerId::new(), None, BTreeSet::new(), max_activations)
            .await
            .unwrap()
    }

    pub async fn active_count(&self, code: &LicenseCode) -> u32 {
        use keygate_store::ActivationStore;
        self.activations.count_active(code).await.unwrap()
    }
}
