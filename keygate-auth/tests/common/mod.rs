//! Shared test fixture: a session engine over an in-memory credential
//! store and a manually driven clock.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use keygate_auth::{AuthConfig, SessionEngine};
use keygate_crypto::{hash_password, Keyring};
use keygate_store::MemoryCredentialStore;
use keygate_types::{
    KeyId, ManualClock, PrincipalId, PrincipalKind, PrincipalRecord, PrincipalStatus,
};
use std::sync::Arc;

pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct Fixture {
    pub credentials: Arc<MemoryCredentialStore>,
    pub keyring: Arc<Keyring>,
    pub clock: Arc<ManualClock>,
    pub engine: SessionEngine,
    pub config: AuthConfig,
}

pub async fn fixture() -> Fixture {
    fixture_with(AuthConfig::default()).await
}

pub async fn fixture_with(config: AuthConfig) -> Fixture {
    let seed: [u8; 32] = [9; 32];
    let keyring = Arc::new(Keyring::from_seed(KeyId::new("k1"), &seed));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ));
    let credentials = Arc::new(MemoryCredentialStore::new());

    credentials
        .insert_principal(PrincipalRecord {
            id: PrincipalId::new("admin"),
            kind: PrincipalKind::Administrator,
            role: "admin".to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
            status: PrincipalStatus::Active,
        })
        .await;
    credentials
        .insert_principal(PrincipalRecord {
            id: PrincipalId::new("disabled-user"),
            kind: PrincipalKind::CustomerUser,
            role: "viewer".to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
            status: PrincipalStatus::Disabled,
        })
        .await;

    let engine = SessionEngine::new(
        credentials.clone(),
        keyring.clone(),
        clock.clone(),
        config.clone(),
    );

    Fixture {
        credentials,
        keyring,
        clock,
        engine,
        config,
    }
}

impl Fixture {
    pub fn admin(&self) -> PrincipalId {
        PrincipalId::new("admin")
    }

    pub async fn login(&self) -> keygate_auth::SessionToken {
        self.engine
            .authenticate(PrincipalKind::Administrator, &self.admin(), ADMIN_PASSWORD)
            .await
            .unwrap()
    }
}
