//! In-memory chat history for one CLI session
//!
//! Deliberately not persisted: a room's chat only exists for whoever's
//! connected right now, the same way a browser tab's chat disappears on
//! reload. Nothing here touches `tallow_store`.

use chrono::{DateTime, Utc};
use tallow_protocol::ids::PeerId;

/// One chat line, tagged with who sent it and when it arrived locally.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub from: PeerId,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Append-only message history for the lifetime of one room session.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message and return it.
    pub fn push(&mut self, from: PeerId, text: String) -> &ChatMessage {
        self.messages.push(ChatMessage { from, text, at: Utc::now() });
        self.messages.last().expect("just pushed")
    }

    /// Iterate messages in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// Number of messages recorded so far.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no messages have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
