//! Persisted configuration for the AgencyZen dashboard.
//!
//! This crate provides:
//!
//! - **Settings record**: API keys plus chat and image model choices,
//!   with masking for display
//! - **Settings store**: one JSON file, loaded with defaults when
//!   absent and overwritten wholesale on save

pub mod error;
pub mod settings;
pub mod store;

pub use error::SettingsError;
pub use settings::{ChatModel, ImageModel, Settings};
pub use store::SettingsStore;
