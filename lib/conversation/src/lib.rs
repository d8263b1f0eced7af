//! Conversation service for the agencyzen platform.
//!
//! This crate provides:
//!
//! - **Conversations**: WhatsApp-style threads with unread counters and tags
//! - **Inbox**: the ordered conversation list with search
//! - **Pending replies**: delayed fake agent replies with cancellation
//! - **Fixtures**: the dashboard's canned inbox (`sample_inbox`)

pub mod conversation;
pub mod error;
pub mod inbox;
pub mod message;
pub mod reply;
pub mod sample;

pub use conversation::{Contact, Conversation, Presence};
pub use error::ConversationError;
pub use inbox::Inbox;
pub use message::{DeliveryState, Message, Sender};
pub use reply::{DEFAULT_REPLY_DELAY, PendingReply};
pub use sample::sample_inbox;
