//! AI personas for the agencyzen platform.
//!
//! This crate models the agency's AI team:
//!
//! - **Personas**: named team members with a role, system prompt and chat history
//! - **Chat backends**: pluggable reply generation behind an async trait
//! - **Approval queue**: manager sign-off on posts and ads
//! - **Roster**: in-memory registry seeded with the stock agency team

pub mod approval;
pub mod backend;
pub mod error;
pub mod persona;
pub mod roster;

pub use approval::{Approval, ApprovalKind, ApprovalQueue, ApprovalStatus, sample_approvals};
pub use backend::{CannedBackend, ChatBackend, ChatRole, ChatTurn};
pub use error::{AgentError, ChatError};
pub use persona::{AgentRole, AgentStatus, HISTORY_WINDOW, Persona, PersonaConfig};
pub use roster::{AgentRoster, default_roster};
