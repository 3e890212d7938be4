//! Authentication principals and login-attempt tracking.

use crate::ids::PrincipalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two kinds of principal the management surface authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// Operator of the license server.
    Administrator,
    /// End user of a customer portal account.
    CustomerUser,
}

/// Account status of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalStatus {
    /// May authenticate normally.
    Active,
    /// Administratively disabled; authentication is rejected outright.
    Disabled,
}

/// A principal as held by the credential store. Read-only to the engine;
/// account management happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRecord {
    /// Unique identifier within the principal kind.
    pub id: PrincipalId,
    /// Administrator or customer user.
    pub kind: PrincipalKind,
    /// Role claim carried into issued tokens.
    pub role: String,
    /// Argon2id password hash in PHC string format.
    pub password_hash: String,
    /// Account status.
    pub status: PrincipalStatus,
}

/// Consecutive-failure tracking for one principal.
///
/// Created lazily on the first failure; reset on success; the lockout
/// window, once set, blocks authentication until the clock passes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempts {
    /// The principal being tracked.
    pub principal_id: PrincipalId,
    /// Consecutive failed attempts since the last success.
    pub failures: u32,
    /// If set and in the future, authentication is blocked until then.
    pub locked_until: Option<DateTime<Utc>>,
    /// Optimistic-concurrency version counter, incremented on every save.
    pub version: u64,
}

impl LoginAttempts {
    /// A fresh record with no failures.
    #[must_use]
    pub fn new(principal_id: PrincipalId) -> Self {
        Self {
            principal_id,
            failures: 0,
            locked_until: None,
            version: 0,
        }
    }

    /// Returns true if the lockout window is set and still in the future.
    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if now < until)
    }
}
