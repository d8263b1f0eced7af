//! Prompt building and polling for simulated image generation.
//!
//! Mirrors a Replicate-style prediction API: a request is created, then
//! polled until it succeeds, fails or the polling budget runs out. The
//! backend sits behind a trait so the dashboard runs against
//! [`SimulatedBackend`] without any network access:
//!
//! - [`ImageRequest`] builds prompts, including the social-post and ad
//!   presets with brand colors and platform hints.
//! - [`ImageGenerator`] drives the create-then-poll loop.
//! - [`AVAILABLE_MODELS`] is the catalog surfaced in the dashboard.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use agencyzen_core::PredictionId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use tokio::sync::Mutex;

use crate::error::IntegrationError;

/// Model id to backend version pin. Unknown ids fall back to the first
/// entry.
const MODEL_VERSIONS: [(&str, &str); 4] = [
    ("flux-schnell", "black-forest-labs/flux-schnell"),
    ("flux-pro", "black-forest-labs/flux-pro"),
    (
        "sdxl",
        "stability-ai/sdxl:39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b",
    ),
    (
        "kandinsky",
        "ai-forever/kandinsky-2.2:ea1addaab376f4dc227f5368bbd8ac01a63b8cc3df21b41daa35e63f5d4e3f1",
    ),
];

/// The models offered in the dashboard's generation form.
pub const AVAILABLE_MODELS: [ModelListing; 3] = [
    ModelListing {
        id: "flux-schnell",
        name: "Flux Schnell",
        price: "$0.003/imagem",
        speed: "Rápido",
        quality: "Boa",
    },
    ModelListing {
        id: "flux-pro",
        name: "Flux Pro",
        price: "$0.05/imagem",
        speed: "Médio",
        quality: "Excelente",
    },
    ModelListing {
        id: "sdxl",
        name: "Stable Diffusion XL",
        price: "$0.01/imagem",
        speed: "Médio",
        quality: "Muito boa",
    },
];

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// One row of the model catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelListing {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub speed: &'static str,
    pub quality: &'static str,
}

/// Resolves a model id to its pinned backend version.
#[must_use]
pub fn model_version(model: &str) -> &'static str {
    MODEL_VERSIONS
        .iter()
        .find(|(id, _)| *id == model)
        .map_or(MODEL_VERSIONS[0].1, |(_, version)| version)
}

/// Named style presets appended to prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    Realistic,
    Cartoon,
    Minimalist,
    Artistic,
    Professional,
}

impl StylePreset {
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Realistic => "photorealistic, high quality, detailed, 8k",
            Self::Cartoon => "cartoon style, colorful, animated",
            Self::Minimalist => "minimalist design, clean, simple",
            Self::Artistic => "artistic, creative, abstract",
            Self::Professional => "professional, corporate, clean design",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "realistic" => Some(Self::Realistic),
            "cartoon" => Some(Self::Cartoon),
            "minimalist" => Some(Self::Minimalist),
            "artistic" => Some(Self::Artistic),
            "professional" => Some(Self::Professional),
            _ => None,
        }
    }

    /// Expands a preset name to its suffix. Names that are not presets
    /// pass through unchanged, so callers can hand over free-form style
    /// text.
    #[must_use]
    pub fn resolve(name: &str) -> &str {
        Self::from_name(name).map_or(name, |preset| preset.suffix())
    }
}

/// Target platform for the ad-image preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdPlatform {
    Meta,
    Google,
}

/// A single image generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: String,
    pub style: Option<String>,
    pub width: u32,
    pub height: u32,
    pub num_outputs: u32,
}

impl ImageRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: "flux-schnell".to_string(),
            style: None,
            width: 1024,
            height: 1024,
            num_outputs: 1,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_num_outputs(mut self, num_outputs: u32) -> Self {
        self.num_outputs = num_outputs;
        self
    }

    /// Preset for a social media post image, sized for feeds.
    #[must_use]
    pub fn for_social(description: &str, brand_colors: &[&str], style: Option<&str>) -> Self {
        let mut prompt = format!("Social media post image: {description}");
        if !brand_colors.is_empty() {
            prompt.push_str(&format!(", using colors: {}", brand_colors.join(", ")));
        }
        prompt.push_str(", modern design, eye-catching, suitable for Instagram/Facebook");
        Self::new(prompt)
            .with_style(style.unwrap_or("professional"))
            .with_size(1080, 1080)
    }

    /// Preset for an ad creative, sized for the platform's banner slots.
    #[must_use]
    pub fn for_ads(product: &str, target_audience: &str, platform: AdPlatform) -> Self {
        let mut prompt = format!("Advertisement image for {product}, targeting {target_audience}");
        prompt.push_str(match platform {
            AdPlatform::Meta => ", Facebook/Instagram ad style",
            AdPlatform::Google => ", Google Display Network style",
        });
        prompt.push_str(", professional, high conversion, clear message");
        Self::new(prompt)
            .with_style("professional")
            .with_size(1200, 628)
    }

    /// The prompt with the style suffix applied.
    #[must_use]
    pub fn full_prompt(&self) -> String {
        match &self.style {
            Some(style) => format!("{}, {}", self.prompt, StylePreset::resolve(style)),
            None => self.prompt.clone(),
        }
    }

    /// The input block sent to the prediction backend. Flux models take
    /// an aspect ratio, the older models take explicit dimensions.
    #[must_use]
    pub fn input_payload(&self) -> JsonValue {
        let prompt = self.full_prompt();
        if self.model.contains("flux") {
            let aspect_ratio = if self.width == self.height { "1:1" } else { "16:9" };
            json!({
                "prompt": prompt,
                "num_outputs": self.num_outputs,
                "aspect_ratio": aspect_ratio,
            })
        } else {
            json!({
                "prompt": prompt,
                "width": self.width,
                "height": self.height,
                "num_outputs": self.num_outputs,
            })
        }
    }
}

/// Where a prediction stands when polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionStatus {
    Processing,
    Succeeded(Vec<String>),
    Failed(String),
}

/// A prediction backend the generator can create and poll against.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn create(&self, request: &ImageRequest) -> Result<PredictionId, IntegrationError>;
    async fn poll(&self, id: PredictionId) -> Result<PredictionStatus, IntegrationError>;
}

/// In-memory backend that replays a scripted status sequence. Once the
/// script runs out every further poll reports `Processing`.
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    statuses: Mutex<VecDeque<PredictionStatus>>,
    created: Mutex<Vec<String>>,
}

impl SimulatedBackend {
    #[must_use]
    pub fn scripted(statuses: impl IntoIterator<Item = PredictionStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into_iter().collect()),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Reports `Processing` for `polls` rounds, then succeeds with `urls`.
    #[must_use]
    pub fn succeeding_after(polls: usize, urls: Vec<String>) -> Self {
        let mut script: Vec<_> = std::iter::repeat_n(PredictionStatus::Processing, polls).collect();
        script.push(PredictionStatus::Succeeded(urls));
        Self::scripted(script)
    }

    #[must_use]
    pub fn failing_with(reason: impl Into<String>) -> Self {
        Self::scripted([PredictionStatus::Failed(reason.into())])
    }

    /// Full prompts of every request created so far.
    pub async fn created_prompts(&self) -> Vec<String> {
        self.created.lock().await.clone()
    }
}

#[async_trait]
impl ImageBackend for SimulatedBackend {
    async fn create(&self, request: &ImageRequest) -> Result<PredictionId, IntegrationError> {
        self.created.lock().await.push(request.full_prompt());
        Ok(PredictionId::new())
    }

    async fn poll(&self, _id: PredictionId) -> Result<PredictionStatus, IntegrationError> {
        let next = self.statuses.lock().await.pop_front();
        Ok(next.unwrap_or(PredictionStatus::Processing))
    }
}

/// The finished output of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImages {
    pub images: Vec<String>,
    pub model: String,
    pub prompt: String,
}

/// Drives a backend through the create-then-poll loop.
pub struct ImageGenerator {
    backend: Arc<dyn ImageBackend>,
    api_token: Option<String>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl ImageGenerator {
    #[must_use]
    pub fn new(backend: Arc<dyn ImageBackend>, api_token: Option<String>) -> Self {
        Self {
            backend,
            api_token,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Runs one request to completion. Fails up front when no API token
    /// is configured, and gives up after the polling budget is spent.
    pub async fn generate(
        &self,
        request: &ImageRequest,
    ) -> Result<GeneratedImages, IntegrationError> {
        if self.api_token.is_none() {
            return Err(IntegrationError::TokenMissing);
        }
        let prediction = self.backend.create(request).await?;
        for _ in 0..self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;
            match self.backend.poll(prediction).await? {
                PredictionStatus::Processing => {}
                PredictionStatus::Succeeded(urls) => {
                    return Ok(GeneratedImages {
                        images: urls,
                        model: request.model.clone(),
                        prompt: request.full_prompt(),
                    });
                }
                PredictionStatus::Failed(reason) => {
                    return Err(IntegrationError::PredictionFailed { reason });
                }
            }
        }
        Err(IntegrationError::GenerationTimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_models_fall_back_to_flux_schnell() {
        assert_eq!(model_version("flux-pro"), "black-forest-labs/flux-pro");
        assert_eq!(model_version("no-such-model"), "black-forest-labs/flux-schnell");
    }

    #[test]
    fn catalog_lists_the_three_offered_models() {
        let ids: Vec<_> = AVAILABLE_MODELS.iter().map(|model| model.id).collect();
        assert_eq!(ids, ["flux-schnell", "flux-pro", "sdxl"]);
    }

    #[test]
    fn style_presets_expand_and_free_text_passes_through() {
        assert_eq!(
            StylePreset::resolve("realistic"),
            "photorealistic, high quality, detailed, 8k"
        );
        assert_eq!(StylePreset::resolve("vaporwave glow"), "vaporwave glow");
    }

    #[test]
    fn full_prompt_appends_the_style_suffix() {
        let request = ImageRequest::new("a calm office").with_style("minimalist");
        assert_eq!(
            request.full_prompt(),
            "a calm office, minimalist design, clean, simple"
        );

        let bare = ImageRequest::new("a calm office");
        assert_eq!(bare.full_prompt(), "a calm office");
    }

    #[test]
    fn flux_payloads_use_aspect_ratio() {
        let square = ImageRequest::new("logo sketch");
        let payload = square.input_payload();
        assert_eq!(payload["aspect_ratio"], "1:1");
        assert!(payload.get("width").is_none());

        let wide = ImageRequest::new("banner").with_size(1200, 628);
        assert_eq!(wide.input_payload()["aspect_ratio"], "16:9");
    }

    #[test]
    fn non_flux_payloads_use_dimensions() {
        let request = ImageRequest::new("poster").with_model("sdxl").with_size(800, 600);
        let payload = request.input_payload();
        assert_eq!(payload["width"], 800);
        assert_eq!(payload["height"], 600);
        assert!(payload.get("aspect_ratio").is_none());
    }

    #[test]
    fn social_preset_weaves_in_brand_colors() {
        let request = ImageRequest::for_social("lançamento da coleção", &["azul", "dourado"], None);
        assert_eq!(
            request.prompt,
            "Social media post image: lançamento da coleção, using colors: azul, dourado, \
             modern design, eye-catching, suitable for Instagram/Facebook"
        );
        assert_eq!(request.style.as_deref(), Some("professional"));
        assert_eq!((request.width, request.height), (1080, 1080));

        let plain = ImageRequest::for_social("promo", &[], Some("cartoon"));
        assert!(!plain.prompt.contains("using colors"));
        assert_eq!(plain.style.as_deref(), Some("cartoon"));
    }

    #[test]
    fn ad_preset_adapts_to_the_platform() {
        let meta = ImageRequest::for_ads("curso de inglês", "universitários", AdPlatform::Meta);
        assert!(meta.prompt.contains("Facebook/Instagram ad style"));
        assert_eq!((meta.width, meta.height), (1200, 628));

        let google = ImageRequest::for_ads("curso de inglês", "universitários", AdPlatform::Google);
        assert!(google.prompt.contains("Google Display Network style"));
    }

    #[tokio::test(start_paused = true)]
    async fn generation_succeeds_after_polling() {
        let backend = SimulatedBackend::succeeding_after(
            2,
            vec!["https://replicate.delivery/img-1.png".to_string()],
        );
        let generator = ImageGenerator::new(Arc::new(backend), Some("r8_test".to_string()))
            .with_poll_interval(Duration::from_millis(10));

        let request = ImageRequest::new("a calm office").with_style("professional");
        let generated = generator.generate(&request).await.unwrap();
        assert_eq!(generated.images, ["https://replicate.delivery/img-1.png"]);
        assert_eq!(generated.model, "flux-schnell");
        assert_eq!(generated.prompt, request.full_prompt());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_predictions_surface_the_reason() {
        let backend = SimulatedBackend::failing_with("NSFW content detected");
        let generator = ImageGenerator::new(Arc::new(backend), Some("r8_test".to_string()))
            .with_poll_interval(Duration::from_millis(10));

        let err = generator
            .generate(&ImageRequest::new("anything"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            IntegrationError::PredictionFailed {
                reason: "NSFW content detected".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn polling_gives_up_after_the_attempt_budget() {
        let backend = SimulatedBackend::succeeding_after(10, vec!["late.png".to_string()]);
        let generator = ImageGenerator::new(Arc::new(backend), Some("r8_test".to_string()))
            .with_poll_interval(Duration::from_millis(10))
            .with_max_attempts(3);

        let err = generator
            .generate(&ImageRequest::new("anything"))
            .await
            .unwrap_err();
        assert_eq!(err, IntegrationError::GenerationTimedOut);
    }

    #[tokio::test]
    async fn missing_token_never_reaches_the_backend() {
        let backend = Arc::new(SimulatedBackend::succeeding_after(
            0,
            vec!["img.png".to_string()],
        ));
        let generator = ImageGenerator::new(Arc::clone(&backend) as Arc<dyn ImageBackend>, None);

        let err = generator
            .generate(&ImageRequest::new("anything"))
            .await
            .unwrap_err();
        assert_eq!(err, IntegrationError::TokenMissing);
        assert!(backend.created_prompts().await.is_empty());
    }
}
