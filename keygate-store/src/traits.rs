//! The repository traits the engine consumes.

use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keygate_types::{
    Activation, License, LicenseCode, LoginAttempts, MachineFingerprint, PrincipalId,
    PrincipalKind, PrincipalRecord,
};

/// Storage for license records.
#[async_trait]
pub trait LicenseStore: Send + Sync {
    /// Looks up a license by its code.
    async fn get(&self, code: &LicenseCode) -> StoreResult<Option<License>>;

    /// Saves a license under the optimistic-concurrency contract: fails
    /// with `VersionConflict` if the stored version no longer matches.
    /// Inserting a new record requires that the code is unused.
    async fn save(&self, license: &License) -> StoreResult<()>;
}

/// Storage for activation records.
#[async_trait]
pub trait ActivationStore: Send + Sync {
    /// Finds the activation binding a license to a fingerprint, in any
    /// status. At most one record exists per (license, fingerprint) pair.
    async fn find_by_fingerprint(
        &self,
        code: &LicenseCode,
        fingerprint: &MachineFingerprint,
    ) -> StoreResult<Option<Activation>>;

    /// Counts activations in `active` status for a license.
    async fn count_active(&self, code: &LicenseCode) -> StoreResult<u32>;

    /// Saves an activation under the optimistic-concurrency contract.
    async fn save(&self, activation: &Activation) -> StoreResult<()>;

    /// Returns all `active` activations whose last heartbeat is older
    /// than `older_than`. Used by the reclamation pass.
    async fn scan_stale(&self, older_than: DateTime<Utc>) -> StoreResult<Vec<Activation>>;
}

/// Storage for principals and their login-attempt records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks up a principal by kind and identifier.
    async fn get_principal(
        &self,
        kind: PrincipalKind,
        id: &PrincipalId,
    ) -> StoreResult<Option<PrincipalRecord>>;

    /// Returns the login-attempt record for a principal, if one exists.
    /// Absence means no failures have been recorded.
    async fn get_login_attempts(&self, id: &PrincipalId) -> StoreResult<Option<LoginAttempts>>;

    /// Saves a login-attempt record under the optimistic-concurrency
    /// contract.
    async fn save_login_attempts(&self, record: &LoginAttempts) -> StoreResult<()>;
}
