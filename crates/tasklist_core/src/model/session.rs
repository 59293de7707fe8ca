//! Session identity model.
//!
//! # Invariants
//! - At most one identity is active at a time.
//! - Every item belongs to exactly one `OwnerId`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const LOCAL_OWNER: &str = "local";

/// Owner key scoping an item collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Implicit owner of the single-slot local variant.
    pub fn local() -> Self {
        Self(LOCAL_OWNER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated identity handed out by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: OwnerId,
    pub email: String,
}

/// Session transition notification.
///
/// `None` means no identity is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChanged(pub Option<Identity>);
