//! File-backed persistence for the settings record.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::settings::Settings;

/// Loads and saves the settings record at a fixed path. The record is
/// one JSON document, written wholesale on every save.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record, falling back to defaults when no file exists
    /// yet.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|err| SettingsError::Io {
            reason: err.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|err| SettingsError::Malformed {
            reason: err.to_string(),
        })
    }

    /// Writes the whole record, replacing whatever was there.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent).map_err(|err| SettingsError::Io {
                reason: err.to_string(),
            })?;
        }
        let json = serde_json::to_string_pretty(settings).map_err(|err| SettingsError::Io {
            reason: err.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|err| SettingsError::Io {
            reason: err.to_string(),
        })
    }
}
