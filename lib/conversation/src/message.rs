//! Message types for conversations.

use agencyzen_core::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The contact on the other end.
    User,
    /// An automated journey or persona reply.
    Bot,
    /// A human operator at the agency.
    Agent,
}

/// Delivery state of a message, WhatsApp style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Left the agency, not yet confirmed.
    Sent,
    /// Arrived on the other end.
    Delivered,
    /// Seen by the recipient.
    Read,
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Who wrote it.
    pub sender: Sender,
    /// Message content.
    pub content: String,
    /// Delivery state.
    pub state: DeliveryState,
    /// When the message was written.
    pub at: DateTime<Utc>,
}

impl Message {
    /// Creates a new message.
    #[must_use]
    pub fn new(sender: Sender, content: impl Into<String>, state: DeliveryState) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            content: content.into(),
            state,
            at: Utc::now(),
        }
    }

    /// Creates an inbound message from the contact, delivered but unread.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content, DeliveryState::Delivered)
    }

    /// Creates an automated reply, freshly sent.
    #[must_use]
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content, DeliveryState::Sent)
    }

    /// Creates an operator message, freshly sent.
    #[must_use]
    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(Sender::Agent, content, DeliveryState::Sent)
    }

    /// Overrides the delivery state.
    #[must_use]
    pub fn with_state(mut self, state: DeliveryState) -> Self {
        self.state = state;
        self
    }
}
