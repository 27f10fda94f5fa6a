//! ChatTransport trait — the abstraction over the remote LLM endpoint.
//!
//! A transport knows how to deliver a short list of role-tagged messages to
//! a model and return its reply. Timeout, retry, and sampling parameters
//! (temperature, max tokens) are transport configuration; they surface here
//! only as an opaque [`TransportError`].

use crate::error::TransportError;
use crate::message::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One role-tagged message bound for the model.
///
/// This is the composer's output shape, not the thread [`crate::Message`]:
/// no id, no timestamp, no snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub role: Role,
    pub content: String,
}

impl OutboundMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// The model's reply to one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The generated text.
    pub content: String,

    /// Epoch milliseconds at completion; becomes the exchange record's key.
    pub timestamp: i64,
}

/// The transport contract.
///
/// `system` is carried separately because providers differ on where a
/// system prompt goes (top-level field vs. leading message); the transport
/// owns that decision.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// A human-readable name for this transport (e.g. "openai_compat").
    fn name(&self) -> &str;

    /// Send the composed messages to the given model and await its reply.
    ///
    /// Runs to completion or explicit failure; never silently dropped
    /// mid-flight by new input.
    async fn send(
        &self,
        system: Option<&str>,
        messages: &[OutboundMessage],
        model: &str,
    ) -> std::result::Result<ChatReply, TransportError>;
}
