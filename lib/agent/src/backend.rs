//! Chat backend abstraction.
//!
//! Personas delegate reply generation to a [`ChatBackend`]. A real
//! deployment plugs an LLM provider in here; the console and tests run on
//! [`CannedBackend`].

use crate::error::ChatError;
use crate::persona::PersonaConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The role of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Human message.
    User,
    /// Persona reply.
    Assistant,
}

/// A single turn in a persona's chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke.
    pub role: ChatRole,
    /// What was said.
    pub content: String,
}

impl ChatTurn {
    /// Creates a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for chat reply generation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Generates a reply given the persona's system prompt, the recent
    /// turns (newest last) and its generation parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot produce a reply.
    async fn generate(
        &self,
        system_prompt: &str,
        turns: &[ChatTurn],
        config: &PersonaConfig,
    ) -> Result<String, ChatError>;
}

/// Backend that replays a fixed list of replies, cycling when exhausted.
#[derive(Debug, Default)]
pub struct CannedBackend {
    replies: Vec<String>,
    next: AtomicUsize,
}

impl CannedBackend {
    /// Creates a backend that cycles through `replies`.
    #[must_use]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChatBackend for CannedBackend {
    async fn generate(
        &self,
        _system_prompt: &str,
        _turns: &[ChatTurn],
        _config: &PersonaConfig,
    ) -> Result<String, ChatError> {
        if self.replies.is_empty() {
            return Err(ChatError::BackendFailed {
                reason: "no canned replies".to_string(),
            });
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        Ok(self.replies[index].clone())
    }
}
