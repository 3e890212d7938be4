//! In-memory store implementations.
//!
//! Used by tests and single-process deployments. All three enforce the
//! same optimistic-concurrency contract a database-backed implementation
//! would: version-checked saves that fail with `VersionConflict` on stale
//! writes, including an insert racing an existing record.

use crate::error::{StoreError, StoreResult};
use crate::traits::{ActivationStore, CredentialStore, LicenseStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keygate_types::{
    Activation, License, LicenseCode, LoginAttempts, MachineFingerprint, PrincipalId,
    PrincipalKind, PrincipalRecord,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Checks the incoming version against the stored one and returns the
/// version the new record should be saved with.
fn next_version(incoming: u64, stored: Option<u64>) -> StoreResult<u64> {
    match stored {
        Some(current) if current != incoming => Err(StoreError::VersionConflict),
        _ => Ok(incoming + 1),
    }
}

/// In-memory [`LicenseStore`].
#[derive(Default)]
pub struct MemoryLicenseStore {
    licenses: RwLock<HashMap<LicenseCode, License>>,
}

impl MemoryLicenseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LicenseStore for MemoryLicenseStore {
    async fn get(&self, code: &LicenseCode) -> StoreResult<Option<License>> {
        Ok(self.licenses.read().await.get(code).cloned())
    }

    async fn save(&self, license: &License) -> StoreResult<()> {
        let mut licenses = self.licenses.write().await;
        let stored = licenses.get(&license.code).map(|l| l.version);
        let version = next_version(license.version, stored)?;
        let mut saved = license.clone();
        saved.version = version;
        licenses.insert(saved.code.clone(), saved);
        Ok(())
    }
}

/// In-memory [`ActivationStore`]. Records are keyed by
/// (license code, fingerprint) — one binding per machine per license.
#[derive(Default)]
pub struct MemoryActivationStore {
    activations: RwLock<HashMap<(LicenseCode, MachineFingerprint), Activation>>,
}

impl MemoryActivationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivationStore for MemoryActivationStore {
    async fn find_by_fingerprint(
        &self,
        code: &LicenseCode,
        fingerprint: &MachineFingerprint,
    ) -> StoreResult<Option<Activation>> {
        let key = (code.clone(), fingerprint.clone());
        Ok(self.activations.read().await.get(&key).cloned())
    }

    async fn count_active(&self, code: &LicenseCode) -> StoreResult<u32> {
        let activations = self.activations.read().await;
        let count = activations
            .values()
            .filter(|a| &a.license_code == code && a.is_active())
            .count();
        Ok(count as u32)
    }

    async fn save(&self, activation: &Activation) -> StoreResult<()> {
        let mut activations = self.activations.write().await;
        let key = (activation.license_code.clone(), activation.fingerprint.clone());
        let stored = activations.get(&key).map(|a| a.version);
        let version = next_version(activation.version, stored)?;
        let mut saved = activation.clone();
        saved.version = version;
        activations.insert(key, saved);
        Ok(())
    }

    async fn scan_stale(&self, older_than: DateTime<Utc>) -> StoreResult<Vec<Activation>> {
        let activations = self.activations.read().await;
        Ok(activations
            .values()
            .filter(|a| a.is_active() && a.is_stale(older_than))
            .cloned()
            .collect())
    }
}

/// In-memory [`CredentialStore`].
///
/// Principals are seeded through [`MemoryCredentialStore::insert_principal`];
/// account management is outside the engine, so the trait itself only
/// reads them.
#[derive(Default)]
pub struct MemoryCredentialStore {
    principals: RwLock<HashMap<(PrincipalKind, PrincipalId), PrincipalRecord>>,
    attempts: RwLock<HashMap<PrincipalId, LoginAttempts>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a principal record.
    pub async fn insert_principal(&self, record: PrincipalRecord) {
        self.principals
            .write()
            .await
            .insert((record.kind, record.id.clone()), record);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_principal(
        &self,
        kind: PrincipalKind,
        id: &PrincipalId,
    ) -> StoreResult<Option<PrincipalRecord>> {
        let key = (kind, id.clone());
        Ok(self.principals.read().await.get(&key).cloned())
    }

    async fn get_login_attempts(&self, id: &PrincipalId) -> StoreResult<Option<LoginAttempts>> {
        Ok(self.attempts.read().await.get(id).cloned())
    }

    async fn save_login_attempts(&self, record: &LoginAttempts) -> StoreResult<()> {
        let mut attempts = self.attempts.write().await;
        let stored = attempts.get(&record.principal_id).map(|r| r.version);
        let version = next_version(record.version, stored)?;
        let mut saved = record.clone();
        saved.version = version;
        attempts.insert(saved.principal_id.clone(), saved);
        Ok(())
    }
}
