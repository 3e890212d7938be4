//! Customer records referenced by licenses. Read-only to the engine.

use crate::ids::CustomerId;
use serde::{Deserialize, Serialize};

/// A customer a license can be issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Contact address (email or similar).
    pub contact: String,
}

impl Customer {
    /// Creates a customer with a fresh ID.
    #[must_use]
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            id: CustomerId::new(),
            name: name.into(),
            contact: contact.into(),
        }
    }
}
