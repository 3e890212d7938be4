//! Repository traits and in-memory stores for the keygate engine.
//!
//! The engine never owns persistence. It reads and writes licenses,
//! activations, and credentials through the traits defined here; the
//! deployment decides what sits behind them (the in-memory stores in this
//! crate for tests and single-process setups, a database elsewhere).
//!
//! # Concurrency contract
//!
//! Every record carries a `version` counter. `save` succeeds only when the
//! incoming record's version matches the stored one, then increments it —
//! a stale write fails with [`StoreError::VersionConflict`] and the caller
//! re-reads and retries. Engines additionally wrap every store call in
//! [`with_deadline`] so a hung backend surfaces as a retryable
//! [`StoreError::Timeout`] instead of blocking a request forever.

mod deadline;
mod error;
mod locks;
mod memory;
mod traits;

pub use deadline::with_deadline;
pub use error::{StoreError, StoreResult};
pub use locks::LockRegistry;
pub use memory::{MemoryActivationStore, MemoryCredentialStore, MemoryLicenseStore};
pub use traits::{ActivationStore, CredentialStore, LicenseStore};
