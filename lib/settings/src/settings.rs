//! The dashboard's configuration record: API keys and model choices.

use serde::{Deserialize, Serialize};

/// Chat models the agent personas can run on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatModel {
    #[default]
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
    #[serde(rename = "gpt-4")]
    Gpt4,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl ChatModel {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Gpt4Turbo => "GPT-4 Turbo",
            Self::Gpt4 => "GPT-4",
            Self::Gpt35Turbo => "GPT-3.5 Turbo",
        }
    }
}

/// Image models offered for content generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageModel {
    #[default]
    #[serde(rename = "flux-schnell")]
    FluxSchnell,
    #[serde(rename = "flux-pro")]
    FluxPro,
    #[serde(rename = "sdxl")]
    Sdxl,
}

impl ImageModel {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::FluxSchnell => "Flux Schnell",
            Self::FluxPro => "Flux Pro",
            Self::Sdxl => "SDXL",
        }
    }
}

/// Everything the dashboard persists between runs. Keys are kept as
/// plain strings, empty meaning not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub openai_key: String,
    pub replicate_key: String,
    pub model: ChatModel,
    pub image_model: ImageModel,
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_openai_key(mut self, key: impl Into<String>) -> Self {
        self.openai_key = key.into();
        self
    }

    #[must_use]
    pub fn with_replicate_key(mut self, key: impl Into<String>) -> Self {
        self.replicate_key = key.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: ChatModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_image_model(mut self, model: ImageModel) -> Self {
        self.image_model = model;
        self
    }

    #[must_use]
    pub fn openai_configured(&self) -> bool {
        !self.openai_key.trim().is_empty()
    }

    #[must_use]
    pub fn replicate_configured(&self) -> bool {
        !self.replicate_key.trim().is_empty()
    }

    /// The OpenAI key with its middle hidden, for display. Keys too
    /// short to keep head and tail apart are masked entirely.
    #[must_use]
    pub fn masked_openai_key(&self) -> String {
        let chars: Vec<char> = self.openai_key.chars().collect();
        if chars.len() <= 7 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pick_the_turbo_and_flux_models() {
        let settings = Settings::default();
        assert_eq!(settings.model, ChatModel::Gpt4Turbo);
        assert_eq!(settings.image_model, ImageModel::FluxSchnell);
        assert!(!settings.openai_configured());
        assert!(!settings.replicate_configured());
    }

    #[test]
    fn models_serialize_as_kebab_ids() {
        let settings = Settings::new()
            .with_model(ChatModel::Gpt35Turbo)
            .with_image_model(ImageModel::Sdxl);
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["image_model"], "sdxl");
    }

    #[test]
    fn partial_records_fill_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"openai_key": "sk-proj-abcdef"}"#).unwrap();
        assert_eq!(settings.openai_key, "sk-proj-abcdef");
        assert_eq!(settings.model, ChatModel::Gpt4Turbo);
        assert!(settings.openai_configured());
    }

    #[test]
    fn masked_key_keeps_head_and_tail() {
        let settings = Settings::new().with_openai_key("sk-proj-1234567890abcd");
        assert_eq!(settings.masked_openai_key(), "sk-...abcd");
    }

    #[test]
    fn short_keys_are_fully_masked() {
        assert_eq!(Settings::new().with_openai_key("sk-12").masked_openai_key(), "*****");
        assert_eq!(Settings::new().masked_openai_key(), "");
    }

    #[test]
    fn display_names_are_human_readable() {
        assert_eq!(ChatModel::Gpt4Turbo.display_name(), "GPT-4 Turbo");
        assert_eq!(ChatModel::Gpt35Turbo.display_name(), "GPT-3.5 Turbo");
        assert_eq!(ImageModel::Sdxl.display_name(), "SDXL");
    }

    #[test]
    fn blank_keys_do_not_count_as_configured() {
        let settings = Settings::new().with_openai_key("   ");
        assert!(!settings.openai_configured());
    }
}
