//! Core domain types and utilities for the agencyzen workspace.
//!
//! This crate provides the foundational ID types and error handling shared
//! across the agencyzen marketing-automation crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ClientId, ConversationId, FlowId, MessageId, ParseIdError, PredictionId, RunId};
