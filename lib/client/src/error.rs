//! Error types for the client crate.

use agencyzen_core::ClientId;
use std::fmt;

/// Errors from client registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A required field was left blank.
    MissingField { field: String },
    /// No client registered under this id.
    ClientNotFound { client_id: ClientId },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "missing required field: {field}")
            }
            Self::ClientNotFound { client_id } => {
                write!(f, "client not found: {client_id}")
            }
        }
    }
}

impl std::error::Error for ClientError {}
