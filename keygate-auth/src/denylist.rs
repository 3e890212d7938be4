//! The token deny-list: early invalidation for stateless tokens.

use keygate_types::TokenId;
use std::collections::HashMap;
use std::sync::Mutex;

/// Token ids that must be rejected before their natural expiry.
///
/// Entries carry the token's expiry so the list stays short-lived:
/// anything past expiry is pruned opportunistically on every insert and
/// lookup, since the ordinary expiry check already rejects those tokens.
#[derive(Debug, Default)]
pub struct DenyList {
    entries: Mutex<HashMap<TokenId, i64>>,
}

impl DenyList {
    /// Creates an empty deny-list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Denies a token id until its expiry (Unix seconds).
    pub fn insert(&self, jti: TokenId, expires_at: i64, now: i64) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, exp| *exp > now);
        entries.insert(jti, expires_at);
    }

    /// Returns true if the token id is currently denied.
    pub fn contains(&self, jti: &TokenId, now: i64) -> bool {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, exp| *exp > now);
        entries.contains_key(jti)
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns true if no entries are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
