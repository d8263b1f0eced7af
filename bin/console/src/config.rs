//! Centralized console configuration.
//!
//! This module provides strongly-typed configuration for the console,
//! loaded via the `config` crate from `AGENCYZEN__`-prefixed
//! environment variables.

use serde::Deserialize;

/// Console configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Where the settings record lives on disk.
    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    /// Delay before a fake conversation reply lands, in milliseconds.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Bound on steps per journey run.
    /// Journeys may contain cycles, so runs are always cut off.
    #[serde(default = "default_engine_step_limit")]
    pub engine_step_limit: usize,
}

fn default_settings_path() -> String {
    "agencyzen.json".to_string()
}

fn default_reply_delay_ms() -> u64 {
    1500
}

fn default_engine_step_limit() -> usize {
    64
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            reply_delay_ms: default_reply_delay_ms(),
            engine_step_limit: default_engine_step_limit(),
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("AGENCYZEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_has_correct_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.settings_path, "agencyzen.json");
        assert_eq!(config.reply_delay_ms, 1500);
        assert_eq!(config.engine_step_limit, 64);
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        let config = ConsoleConfig::from_env().expect("load config");
        assert_eq!(config.engine_step_limit, 64);
    }
}
