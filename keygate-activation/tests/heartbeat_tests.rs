mod common;

use chrono::Duration;
use common::fixture;
use keygate_activation::ActivationError;
use keygate_license::LicenseError;
use keygate_store::ActivationStore;
use keygate_types::{ActivationStatus, Clock, MachineFingerprint};

#[tokio::test]
async fn heartbeat_refreshes_the_timestamp() {
    let fx = fixture();
    let license = fx.issue(1).await;
    let fingerprint = MachineFingerprint::new("MACHINE-A");

    fx.manager
        .activate(&license.code, &license.signature, &fingerprint)
        .await
        .unwrap();

    fx.clock.advance(Duration::minutes(4));
    let ack = fx.tracker.heartbeat(&license.code, &fingerprint).await.unwrap();
    assert_eq!(ack.next_interval, fx.config.heartbeat_interval);

    let record = fx
        .activations
        .find_by_fingerprint(&license.code, &fingerprint)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.last_heartbeat, fx.clock.now());
}

#[tokio::test]
async fn heartbeat_without_activation_is_not_found() {
    let fx = fixture();
    let license = fx.issue(1).await;

    let err = fx
        .tracker
        .heartbeat(&license.code, &MachineFingerprint::new("NEVER-ACTIVATED"))
        .await
        .unwrap_err();
    assert!(matches!(err, ActivationError::NotFound));
}

#[tokio::test]
async fn heartbeat_on_revoked_license_is_rejected() {
    let fx = fixture();
    let license = fx.issue(1).await;
    let fingerprint = MachineFingerprint::new("MACHINE-A");

    fx.manager
        .activate(&license.code, &license.signature, &fingerprint)
        .await
        .unwrap();
    fx.issuer.revoke(&license.code).await.unwrap();

    let err = fx
        .tracker
        .heartbeat(&license.code, &fingerprint)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ActivationError::License(LicenseError::Revoked)
    ));
}

#[tokio::test]
async fn silent_activation_is_reclaimed_and_its_slot_freed() {
    let fx = fixture();
    let license = fx.issue(1).await;
    let silent = MachineFingerprint::new("SILENT");
    let replacement = MachineFingerprint::new("REPLACEMENT");

    fx.manager
        .activate(&license.code, &license.signature, &silent)
        .await
        .unwrap();

    // Replacement cannot activate while the slot is held.
    let err = fx
        .manager
        .activate(&license.code, &license.signature, &replacement)
        .await
        .unwrap_err();
    assert!(matches!(err, ActivationError::LimitExceeded { .. }));

    // Past the stale window, the scan reclaims the silent slot.
    fx.clock.advance(
        Duration::from_std(fx.config.stale_after()).unwrap() + Duration::seconds(1),
    );
    let reclaimed = fx.tracker.reclaim_stale().await.unwrap();
    assert_eq!(reclaimed, 1);

    let record = fx
        .activations
        .find_by_fingerprint(&license.code, &silent)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, ActivationStatus::ExpiredByTimeout);

    // The freed slot is available to the new fingerprint.
    fx.manager
        .activate(&license.code, &license.signature, &replacement)
        .await
        .unwrap();
    assert_eq!(fx.active_count(&license.code).await, 1);
}

#[tokio::test]
async fn heartbeating_activation_survives_the_scan() {
    let fx = fixture();
    let license = fx.issue(2).await;
    let live = MachineFingerprint::new("LIVE");
    let silent = MachineFingerprint::new("SILENT");

    fx.manager.activate(&license.code, &license.signature, &live).await.unwrap();
    fx.manager.activate(&license.code, &license.signature, &silent).await.unwrap();

    // LIVE keeps heartbeating across the stale window, SILENT does not.
    let step = Duration::minutes(4);
    let steps = (fx.config.stale_after().as_secs() / 240 + 2) as i32;
    for _ in 0..steps {
        fx.clock.advance(step);
        fx.tracker.heartbeat(&license.code, &live).await.unwrap();
    }

    let reclaimed = fx.tracker.reclaim_stale().await.unwrap();
    assert_eq!(reclaimed, 1);

    assert!(fx
        .activations
        .find_by_fingerprint(&license.code, &live)
        .await
        .unwrap()
        .unwrap()
        .is_active());
    assert_eq!(
        fx.activations
            .find_by_fingerprint(&license.code, &silent)
            .await
            .unwrap()
            .unwrap()
            .status,
        ActivationStatus::ExpiredByTimeout
    );
}

#[tokio::test]
async fn reclaimed_activation_does_not_heartbeat_back_to_life() {
    let fx = fixture();
    let license = fx.issue(1).await;
    let fingerprint = MachineFingerprint::new("MACHINE-A");

    fx.manager
        .activate(&license.code, &license.signature, &fingerprint)
        .await
        .unwrap();

    fx.clock.advance(
        Duration::from_std(fx.config.stale_after()).unwrap() + Duration::seconds(1),
    );
    fx.tracker.reclaim_stale().await.unwrap();

    // The client's next heartbeat is told to re-activate rather than
    // silently resurrecting the reclaimed record.
    let err = fx
        .tracker
        .heartbeat(&license.code, &fingerprint)
        .await
        .unwrap_err();
    assert!(matches!(err, ActivationError::NotFound));
}

#[tokio::test]
async fn reclamation_with_nothing_stale_is_a_no_op() {
    let fx = fixture();
    let license = fx.issue(1).await;
    fx.manager
        .activate(&license.code, &license.signature, &MachineFingerprint::new("M"))
        .await
        .unwrap();

    assert_eq!(fx.tracker.reclaim_stale().await.unwrap(), 0);
    assert_eq!(fx.active_count(&license.code).await, 1);
}

#[tokio::test]
async fn background_loop_reclaims_on_its_own() {
    use keygate_activation::{spawn_reclamation, ActivationConfig};

    let fx = common::fixture_with(ActivationConfig {
        heartbeat_interval: std::time::Duration::from_millis(20),
        reclaim_timeout_multiple: 3,
        reclaim_scan_interval: std::time::Duration::from_millis(20),
        store_deadline: std::time::Duration::from_secs(1),
    });
    let license = fx.issue(1).await;
    let fingerprint = MachineFingerprint::new("MACHINE-A");

    fx.manager
        .activate(&license.code, &license.signature, &fingerprint)
        .await
        .unwrap();

    // Make the record stale, then let the spawned loop find it.
    fx.clock.advance(Duration::seconds(10));
    let handle = spawn_reclamation(fx.tracker.clone());

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
    loop {
        let record = fx
            .activations
            .find_by_fingerprint(&license.code, &fingerprint)
            .await
            .unwrap()
            .unwrap();
        if record.status == ActivationStatus::ExpiredByTimeout {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "reclamation loop never fired");
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    handle.abort();
}
