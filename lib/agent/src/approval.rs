//! Manager approval queue for posts and ads.
//!
//! Specialist personas submit deliverables here; the manager approves or
//! rejects them. Resolved items stay in the queue so the dashboard can show
//! a history, but drop out of [`ApprovalQueue::pending`].

use crate::error::AgentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// What kind of deliverable awaits review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    /// Social media post.
    Post,
    /// Paid ad campaign.
    Ad,
}

/// Review state of an approval item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Waiting for the manager.
    #[default]
    Pending,
    /// Signed off.
    Approved,
    /// Sent back.
    Rejected,
}

/// A deliverable submitted for manager review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    /// Queue id.
    pub id: String,
    /// What kind of deliverable this is.
    pub kind: ApprovalKind,
    /// Short title shown in the queue.
    pub title: String,
    /// The deliverable itself.
    pub content: String,
    /// Display name of the submitting persona.
    pub agent: String,
    /// Display name of the client it is for.
    pub client: String,
    /// When it entered the queue.
    pub submitted_at: DateTime<Utc>,
    /// Review state.
    pub status: ApprovalStatus,
}

impl Approval {
    /// Creates a pending approval with a fresh id.
    #[must_use]
    pub fn new(
        kind: ApprovalKind,
        title: impl Into<String>,
        content: impl Into<String>,
        agent: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        Self::with_id(Ulid::new().to_string(), kind, title, content, agent, client)
    }

    /// Creates a pending approval with a caller-chosen id.
    #[must_use]
    pub fn with_id(
        id: impl Into<String>,
        kind: ApprovalKind,
        title: impl Into<String>,
        content: impl Into<String>,
        agent: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            content: content.into(),
            agent: agent.into(),
            client: client.into(),
            submitted_at: Utc::now(),
            status: ApprovalStatus::Pending,
        }
    }
}

/// In-memory queue the manager persona reviews.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApprovalQueue {
    items: Vec<Approval>,
}

impl ApprovalQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a deliverable to the queue.
    pub fn submit(&mut self, approval: Approval) {
        self.items.push(approval);
    }

    /// Items still waiting for review, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<&Approval> {
        self.items
            .iter()
            .filter(|item| item.status == ApprovalStatus::Pending)
            .collect()
    }

    /// Signs off on an item.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApprovalNotFound`] if no item has this id.
    pub fn approve(&mut self, id: &str) -> Result<&Approval, AgentError> {
        self.resolve(id, ApprovalStatus::Approved)
    }

    /// Sends an item back.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApprovalNotFound`] if no item has this id.
    pub fn reject(&mut self, id: &str) -> Result<&Approval, AgentError> {
        self.resolve(id, ApprovalStatus::Rejected)
    }

    /// All items, resolved ones included.
    #[must_use]
    pub fn items(&self) -> &[Approval] {
        &self.items
    }

    /// Total number of items, resolved ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was ever submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn resolve(&mut self, id: &str, status: ApprovalStatus) -> Result<&Approval, AgentError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| AgentError::ApprovalNotFound {
                approval_id: id.to_string(),
            })?;
        self.items[index].status = status;
        Ok(&self.items[index])
    }
}

/// The two review items the dashboard ships with.
#[must_use]
pub fn sample_approvals() -> ApprovalQueue {
    let mut queue = ApprovalQueue::new();
    queue.submit(Approval::with_id(
        "1",
        ApprovalKind::Post,
        "Post Instagram - Tech Solutions",
        "🚀 Transforme seu negócio com tecnologia! Descubra como a automação pode aumentar \
         sua produtividade em 300%...",
        "Social Zen",
        "Tech Solutions",
    ));
    queue.submit(Approval::with_id(
        "2",
        ApprovalKind::Ad,
        "Campanha Meta - Moda Feminina",
        "Campanha de conversão para coleção de verão. Orçamento: R$500/dia. Público: \
         Mulheres 25-45...",
        "Traffic Master",
        "Loja Fashion",
    ));
    queue
}
