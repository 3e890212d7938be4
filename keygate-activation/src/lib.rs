//! Machine activation and liveness tracking.
//!
//! This crate enforces the hardest invariant in the engine: the number of
//! `active` activations for a license never exceeds its limit, even under
//! concurrent requests racing for the last slot. All slot accounting for
//! one license — activate, deactivate, reclaim — runs under that license's
//! entry in a [`keygate_store::LockRegistry`], so the sequence of slot
//! operations is linearizable per license while different licenses never
//! contend.
//!
//! Liveness: clients heartbeat on the interval the activation grant told
//! them; the reclamation pass sweeps activations whose heartbeat went
//! silent for longer than the configured timeout multiple and frees their
//! slots.

mod config;
mod error;
mod heartbeat;
mod manager;

pub use config::ActivationConfig;
pub use error::{ActivationError, ActivationResult};
pub use heartbeat::{spawn_reclamation, HeartbeatAck, HeartbeatTracker};
pub use manager::{ActivationGrant, ActivationManager};
