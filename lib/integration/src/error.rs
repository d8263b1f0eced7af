//! Error types for the integration crate.
//!
//! The Portuguese messages are the exact strings the dashboard surfaces
//! to users.

use std::fmt;

/// Errors from the simulated WhatsApp and image-generation integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationError {
    /// Tried to send before the connection was established.
    NotConnected,
    /// No Replicate API token configured.
    TokenMissing,
    /// The image prediction failed on the backend.
    PredictionFailed { reason: String },
    /// The image prediction never finished within the polling budget.
    GenerationTimedOut,
    /// Reading or writing the session file failed.
    SessionIo { reason: String },
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "WhatsApp não conectado"),
            Self::TokenMissing => {
                write!(
                    f,
                    "API token não configurado. Configure REPLICATE_API_TOKEN."
                )
            }
            Self::PredictionFailed { reason } => {
                write!(f, "Geração falhou: {reason}")
            }
            Self::GenerationTimedOut => write!(f, "Timeout aguardando geração"),
            Self::SessionIo { reason } => {
                write!(f, "session file error: {reason}")
            }
        }
    }
}

impl std::error::Error for IntegrationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_connected_display() {
        assert_eq!(
            IntegrationError::NotConnected.to_string(),
            "WhatsApp não conectado"
        );
    }

    #[test]
    fn token_missing_display() {
        assert!(
            IntegrationError::TokenMissing
                .to_string()
                .contains("REPLICATE_API_TOKEN")
        );
    }

    #[test]
    fn prediction_failed_display() {
        let err = IntegrationError::PredictionFailed {
            reason: "NSFW content detected".to_string(),
        };
        assert_eq!(err.to_string(), "Geração falhou: NSFW content detected");
    }
}
