//! Error types for the agent crate.
//!
//! - `ChatError`: chat backend failures
//! - `AgentError`: roster and approval-queue lookups

use std::fmt;

/// Errors from chat backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The backend could not produce a reply.
    BackendFailed { reason: String },
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackendFailed { reason } => {
                write!(f, "chat backend failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ChatError {}

/// Errors from roster and approval operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// No persona registered under this id.
    AgentNotFound { agent_id: String },
    /// No approval item with this id.
    ApprovalNotFound { approval_id: String },
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgentNotFound { agent_id } => {
                write!(f, "agent not found: {agent_id}")
            }
            Self::ApprovalNotFound { approval_id } => {
                write!(f, "approval not found: {approval_id}")
            }
        }
    }
}

impl std::error::Error for AgentError {}
