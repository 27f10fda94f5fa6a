//! Message — the transient, derived view of a thread.
//!
//! Messages are never persisted. They are produced either by hydrating
//! stored exchange records or by a live submission, and exist only to be
//! displayed in timestamp order.

use crate::fragment::FragmentSet;
use serde::{Deserialize, Serialize};

/// The sender of a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The facilitator
    User,
    /// The model
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in the visible thread.
///
/// Ordering key is `timestamp` ascending; a user message always precedes
/// its paired assistant message at equal timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Derived deterministically from `(timestamp, role)` — stable across
    /// hydrations, collision-free as long as timestamps are unique.
    pub id: String,

    /// Who sent this message.
    pub role: Role,

    /// The text content.
    pub content: String,

    /// Epoch milliseconds.
    pub timestamp: i64,

    /// Full fragment snapshot, carried on user messages only so individual
    /// fragments can be restored into the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragments: Option<FragmentSet>,
}

impl Message {
    /// Deterministic id for a `(timestamp, role)` pair.
    pub fn derive_id(timestamp: i64, role: Role) -> String {
        format!("{timestamp}_{role}")
    }

    /// Create a user message carrying its fragment snapshot.
    pub fn user(timestamp: i64, content: impl Into<String>, fragments: FragmentSet) -> Self {
        Self {
            id: Self::derive_id(timestamp, Role::User),
            role: Role::User,
            content: content.into(),
            timestamp,
            fragments: Some(fragments),
        }
    }

    /// Create an assistant message.
    pub fn assistant(timestamp: i64, content: impl Into<String>) -> Self {
        Self {
            id: Self::derive_id(timestamp, Role::Assistant),
            role: Role::Assistant,
            content: content.into(),
            timestamp,
            fragments: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_deterministic_and_role_distinct() {
        assert_eq!(Message::derive_id(100, Role::User), "100_user");
        assert_eq!(Message::derive_id(100, Role::Assistant), "100_assistant");
        assert_ne!(
            Message::derive_id(100, Role::User),
            Message::derive_id(100, Role::Assistant)
        );
    }

    #[test]
    fn user_message_carries_snapshot() {
        let mut set = FragmentSet::default();
        set.current_prompt = "What does the innkeeper say?".into();
        let msg = Message::user(7, set.current_prompt.clone(), set.clone());
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.fragments, Some(set));
    }

    #[test]
    fn assistant_message_has_no_snapshot() {
        let msg = Message::assistant(7, "He grumbles.");
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.fragments.is_none());
    }
}
