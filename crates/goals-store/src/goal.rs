// goal.rs: The goal record, the only persisted entity.
//
// A goal is immutable once created. Its text is validated by the API layer
// before it ever reaches a store, so stores accept any text they are given.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque goal identifier, assigned by the store on creation.
///
/// Clients only ever see it as a string, and delete requests carry whatever
/// string the client sends, so the id is kept as text rather than a parsed
/// UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GoalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GoalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A persisted goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,

    /// The text exactly as submitted (not trimmed).
    pub text: String,

    /// When the store accepted the goal. Used to keep listings in insertion order.
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal with a fresh id, stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: GoalId::generate(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
