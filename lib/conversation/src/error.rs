//! Error types for the conversation crate.

use agencyzen_core::ConversationId;
use std::fmt;

/// Errors from inbox operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// No conversation with this id.
    ConversationNotFound { conversation_id: ConversationId },
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversationNotFound { conversation_id } => {
                write!(f, "conversation not found: {conversation_id}")
            }
        }
    }
}

impl std::error::Error for ConversationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_not_found_display() {
        let err = ConversationError::ConversationNotFound {
            conversation_id: ConversationId::new(),
        };
        assert!(err.to_string().starts_with("conversation not found: conv_"));
    }
}
