//! Simulated external integrations for the AgencyZen dashboard.
//!
//! This crate provides:
//!
//! - **WhatsApp connection**: QR pairing lifecycle, wire log and session
//!   persistence, all in memory
//! - **Image generation**: Replicate-style create-then-poll pipeline with
//!   prompt presets for posts and ads

pub mod error;
pub mod image;
pub mod whatsapp;

pub use error::IntegrationError;
pub use image::{
    AVAILABLE_MODELS, AdPlatform, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, GeneratedImages,
    ImageBackend, ImageGenerator, ImageRequest, ModelListing, PredictionStatus, SimulatedBackend,
    StylePreset, model_version,
};
pub use whatsapp::{
    ConnectionState, ConnectionStatus, Direction, MessageHandler, SessionData, WhatsAppConnection,
    WhatsAppManager, WireMessage, WireStatus,
};
