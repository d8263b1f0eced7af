//! Error types for the settings crate.

use std::fmt;

/// Errors from loading or saving the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Reading or writing the file failed.
    Io { reason: String },
    /// The file exists but does not parse as a settings record.
    Malformed { reason: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { reason } => write!(f, "settings file error: {reason}"),
            Self::Malformed { reason } => write!(f, "malformed settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {}
