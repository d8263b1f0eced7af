//! The conversation list shown on the dashboard.

use crate::conversation::Conversation;
use crate::error::ConversationError;
use agencyzen_core::ConversationId;

/// Ordered collection of conversations.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    conversations: Vec<Conversation>,
}

impl Inbox {
    /// Creates an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a conversation to the end of the list.
    pub fn add(&mut self, conversation: Conversation) {
        self.conversations.push(conversation);
    }

    /// Opens a conversation: marks its thread read and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationError::ConversationNotFound`] if no
    /// conversation has this id.
    pub fn open(&mut self, id: ConversationId) -> Result<&mut Conversation, ConversationError> {
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ConversationError::ConversationNotFound {
                conversation_id: id,
            })?;
        conversation.mark_read();
        Ok(conversation)
    }

    /// Looks up a conversation by id.
    #[must_use]
    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Looks up a conversation by id for mutation.
    pub fn get_mut(&mut self, id: ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    /// All conversations in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Case-insensitive search over contact names.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Conversation> {
        let needle = term.to_lowercase();
        self.conversations
            .iter()
            .filter(|c| c.contact.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Unread messages across all conversations.
    #[must_use]
    pub fn total_unread(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread).sum()
    }

    /// Number of conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Returns true if the inbox holds no conversations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
