//! Shared test helpers for license tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use keygate_crypto::Keyring;
use keygate_license::{IssuerConfig, LicenseIssuer, LicenseValidator, ValidatorConfig};
use keygate_store::MemoryLicenseStore;
use keygate_types::{KeyId, ManualClock};
use std::sync::Arc;

/// Deterministic keyring from a fixed seed.
pub fn test_keyring() -> Arc<Keyring> {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    Arc::new(Keyring::from_seed(KeyId::new("k1"), &seed))
}

/// A clock frozen at a fixed instant so expiry tests are deterministic.
pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ))
}

/// An issuer and validator sharing one store, keyring, and clock.
pub fn engine() -> (
    Arc<MemoryLicenseStore>,
    Arc<Keyring>,
    Arc<ManualClock>,
    LicenseIssuer,
    LicenseValidator,
) {
    let store = Arc::new(MemoryLicenseStore::new());
    let keyring = test_keyring();
    let clock = test_clock();
    let issuer = LicenseIssuer::new(
        store.clone(),
        keyring.clone(),
        clock.clone(),
        IssuerConfig::default(),
    );
    let validator = LicenseValidator::new(
        store.clone(),
        keyring.clone(),
        clock.clone(),
        ValidatorConfig::default(),
    );
    (store, keyring, clock, issuer, validator)
}
