//! Authentication and session management for the management surface.
//!
//! Two principal kinds — administrators and customer users — authenticate
//! through [`SessionEngine`]. Repeated credential failures trip a
//! per-principal lockout window that blocks authentication outright
//! (credentials are not even checked while locked, so lockout cannot be
//! used as a timing oracle). Successful authentication issues a signed,
//! stateless bearer token; early invalidation goes through a short-lived
//! deny-list keyed by token id.
//!
//! The lockout state machine cycles: Normal → (N consecutive failures) →
//! Locked → (window elapses) → Normal. There is no terminal state.

mod claims;
mod denylist;
mod engine;
mod error;

pub use claims::{Claims, SessionToken};
pub use denylist::DenyList;
pub use engine::{AuthConfig, SessionEngine};
pub use error::{AuthError, AuthResult};
