//! WhatsApp-style conversation threads.
//!
//! A conversation tracks the message thread with one contact along with
//! the unread counter, presence and tags shown in the inbox list.

use crate::message::{DeliveryState, Message};
use agencyzen_core::ConversationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the contact is currently around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Contact has the chat open.
    Online,
    /// Contact is away.
    #[default]
    Offline,
    /// Contact is writing right now.
    Typing,
}

impl Presence {
    /// Header label, `None` when the dashboard falls back to the phone
    /// number.
    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Online => Some("Online"),
            Self::Offline => None,
            Self::Typing => Some("Digitando..."),
        }
    }
}

/// The person on the other end of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: String,
}

impl Contact {
    /// Creates a contact.
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// A conversation with one contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: ConversationId,
    /// Who we are talking to.
    pub contact: Contact,
    /// The message thread, oldest first.
    pub messages: Vec<Message>,
    /// Inbound messages not yet read by the agency.
    pub unread: u32,
    /// Contact presence.
    pub presence: Presence,
    /// Labels shown in the inbox list.
    pub tags: Vec<String>,
    /// Persona handling this conversation, if any.
    pub agent: Option<String>,
    /// When the thread last moved.
    pub last_activity: DateTime<Utc>,
}

impl Conversation {
    /// Creates an empty conversation with a contact.
    #[must_use]
    pub fn new(contact: Contact) -> Self {
        Self {
            id: ConversationId::new(),
            contact,
            messages: Vec::new(),
            unread: 0,
            presence: Presence::Offline,
            tags: Vec::new(),
            agent: None,
            last_activity: Utc::now(),
        }
    }

    /// Sets the inbox labels.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Hands the conversation to a persona.
    #[must_use]
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Sets the contact presence.
    #[must_use]
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Appends an operator message.
    pub fn send(&mut self, content: impl Into<String>) {
        self.push(Message::agent(content));
    }

    /// Appends an inbound message from the contact and bumps the unread
    /// counter.
    pub fn record_inbound(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
        self.unread += 1;
    }

    /// Appends an automated reply.
    pub fn record_reply(&mut self, content: impl Into<String>) {
        self.push(Message::bot(content));
    }

    /// Zeroes the unread counter and marks the whole thread read.
    pub fn mark_read(&mut self) {
        self.unread = 0;
        for message in &mut self.messages {
            message.state = DeliveryState::Read;
        }
    }

    /// The last message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// One-line thread preview for the inbox list.
    #[must_use]
    pub fn preview(&self) -> String {
        let Some(message) = self.last_message() else {
            return String::new();
        };
        if message.content.chars().count() > 50 {
            let head: String = message.content.chars().take(47).collect();
            format!("{head}...")
        } else {
            message.content.clone()
        }
    }

    /// Number of messages in the thread.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn push(&mut self, message: Message) {
        self.last_activity = message.at;
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    fn conversation() -> Conversation {
        Conversation::new(Contact::new("Isabella Rainer", "+55 11 99999-0001"))
    }

    #[test]
    fn new_conversation_is_quiet() {
        let conversation = conversation();
        assert!(conversation.messages.is_empty());
        assert_eq!(conversation.unread, 0);
        assert_eq!(conversation.presence, Presence::Offline);
        assert!(conversation.agent.is_none());
    }

    #[test]
    fn send_appends_an_operator_message() {
        let mut conversation = conversation();
        conversation.send("Segue o orçamento!");

        let last = conversation.last_message().unwrap();
        assert_eq!(last.sender, Sender::Agent);
        assert_eq!(last.state, DeliveryState::Sent);
        assert_eq!(conversation.last_activity, last.at);
        assert_eq!(conversation.unread, 0);
    }

    #[test]
    fn record_inbound_bumps_unread() {
        let mut conversation = conversation();
        conversation.record_inbound("Olá, tudo bem?");
        conversation.record_inbound("Vocês fazem tráfego pago?");

        assert_eq!(conversation.unread, 2);
        assert_eq!(conversation.message_count(), 2);
        assert_eq!(
            conversation.last_message().unwrap().state,
            DeliveryState::Delivered
        );
    }

    #[test]
    fn record_reply_appends_a_bot_message() {
        let mut conversation = conversation();
        conversation.record_reply("Fazemos sim! Quer saber os valores?");

        assert_eq!(conversation.last_message().unwrap().sender, Sender::Bot);
        assert_eq!(conversation.unread, 0);
    }

    #[test]
    fn mark_read_clears_the_thread() {
        let mut conversation = conversation();
        conversation.record_inbound("Olá");
        conversation.send("Oi!");
        conversation.mark_read();

        assert_eq!(conversation.unread, 0);
        assert!(
            conversation
                .messages
                .iter()
                .all(|m| m.state == DeliveryState::Read)
        );
    }

    #[test]
    fn preview_truncates_long_messages() {
        let mut conversation = conversation();
        conversation.record_inbound("a".repeat(60));

        let preview = conversation.preview();
        assert_eq!(preview, format!("{}...", "a".repeat(47)));
    }

    #[test]
    fn preview_keeps_short_messages_whole() {
        let mut conversation = conversation();
        conversation.record_inbound("Perfeito, vou aguardar o orçamento");
        assert_eq!(conversation.preview(), "Perfeito, vou aguardar o orçamento");
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let mut conversation = conversation();
        conversation.record_inbound("ã".repeat(60));

        let preview = conversation.preview();
        assert_eq!(preview.chars().count(), 50);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn preview_of_an_empty_thread_is_empty() {
        assert_eq!(conversation().preview(), "");
    }

    #[test]
    fn presence_labels_match_the_header() {
        assert_eq!(Presence::Online.label(), Some("Online"));
        assert_eq!(Presence::Typing.label(), Some("Digitando..."));
        assert_eq!(Presence::Offline.label(), None);
    }

    #[test]
    fn conversation_serde_roundtrip() {
        let mut conversation = conversation().with_tags(["Lead"]).with_agent("Zap Zen");
        conversation.record_inbound("Olá");

        let json = serde_json::to_string(&conversation).expect("serialize");
        let parsed: Conversation = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(parsed.id, conversation.id);
        assert_eq!(parsed.tags, vec!["Lead".to_string()]);
        assert_eq!(parsed.agent.as_deref(), Some("Zap Zen"));
        assert_eq!(parsed.message_count(), 1);
    }
}
