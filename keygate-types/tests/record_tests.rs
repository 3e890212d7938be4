use chrono::{Duration, TimeZone, Utc};
use keygate_types::{
    Activation, ActivationId, ActivationStatus, Clock, CustomerId, KeyId, License, LicenseCode,
    LicenseStatus, LoginAttempts, MachineFingerprint, ManualClock, PrincipalId,
};
use std::collections::BTreeSet;

fn sample_license(expires_at: Option<chrono::DateTime<Utc>>) -> License {
    License {
        code: LicenseCode::new("LIC-TEST-000000000000-AAAA"),
        customer_id: CustomerId::new(),
        issued_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        expires_at,
        features: BTreeSet::from(["core".to_string(), "reports".to_string()]),
        max_activations: 2,
        status: LicenseStatus::Active,
        key_id: KeyId::new("k1"),
        signature: "sig".to_string(),
        version: 0,
    }
}

// ── License ───────────────────────────────────────────────────────

#[test]
fn perpetual_license_never_expires() {
    let license = sample_license(None);
    let far_future = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();
    assert!(!license.is_expired(far_future));
}

#[test]
fn license_expiry_is_exclusive_of_the_instant() {
    let expiry = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let license = sample_license(Some(expiry));
    assert!(!license.is_expired(expiry));
    assert!(license.is_expired(expiry + Duration::seconds(1)));
    assert!(!license.is_expired(expiry - Duration::seconds(1)));
}

#[test]
fn license_feature_lookup() {
    let license = sample_license(None);
    assert!(license.has_feature("core"));
    assert!(!license.has_feature("enterprise"));
}

#[test]
fn license_status_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&LicenseStatus::Revoked).unwrap(),
        "\"revoked\""
    );
}

// ── Activation ────────────────────────────────────────────────────

#[test]
fn activation_staleness_uses_last_heartbeat() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let activation = Activation {
        id: ActivationId::new(),
        license_code: LicenseCode::new("LIC-A"),
        fingerprint: MachineFingerprint::new("MACHINE-A"),
        activated_at: now - Duration::hours(1),
        last_heartbeat: now - Duration::minutes(20),
        status: ActivationStatus::Active,
        version: 0,
    };
    assert!(activation.is_stale(now - Duration::minutes(15)));
    assert!(!activation.is_stale(now - Duration::minutes(25)));
}

#[test]
fn activation_status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&ActivationStatus::ExpiredByTimeout).unwrap(),
        "\"expired_by_timeout\""
    );
}

// ── LoginAttempts ─────────────────────────────────────────────────

#[test]
fn fresh_attempts_record_is_not_locked() {
    let record = LoginAttempts::new(PrincipalId::new("admin"));
    assert_eq!(record.failures, 0);
    assert!(!record.is_locked(Utc::now()));
}

#[test]
fn lockout_window_blocks_until_it_elapses() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut record = LoginAttempts::new(PrincipalId::new("admin"));
    record.locked_until = Some(now + Duration::minutes(30));
    assert!(record.is_locked(now));
    assert!(record.is_locked(now + Duration::minutes(29)));
    assert!(!record.is_locked(now + Duration::minutes(30)));
}

// ── Customer ──────────────────────────────────────────────────────

#[test]
fn customer_gets_a_fresh_id() {
    let a = keygate_types::Customer::new("ACME", "ops@acme.example");
    let b = keygate_types::Customer::new("ACME", "ops@acme.example");
    assert_ne!(a.id, b.id);
    assert_eq!(a.name, "ACME");
}

// ── Clock ─────────────────────────────────────────────────────────

#[test]
fn manual_clock_advances_on_demand() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);
    clock.advance(Duration::seconds(90));
    assert_eq!(clock.now(), start + Duration::seconds(90));
    clock.set(start);
    assert_eq!(clock.now(), start);
}
