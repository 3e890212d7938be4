//! Core type definitions for the keygate licensing engine.
//!
//! This crate defines the fundamental types shared by every engine crate:
//! - License, activation, and principal identifiers
//! - The License / Activation / Customer domain records
//! - Login-attempt tracking for the lockout state machine
//! - The injectable [`Clock`] used for all expiry/timeout decisions
//!
//! Engine behavior (signing, slot accounting, lockout transitions) lives in
//! the respective engine crates, not here.

mod activation;
mod clock;
mod customer;
mod ids;
mod license;
mod principal;

pub use activation::{Activation, ActivationStatus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use customer::Customer;
pub use ids::{ActivationId, CustomerId, KeyId, LicenseCode, MachineFingerprint, PrincipalId, TokenId};
pub use license::{License, LicenseStatus};
pub use principal::{LoginAttempts, PrincipalKind, PrincipalRecord, PrincipalStatus};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
