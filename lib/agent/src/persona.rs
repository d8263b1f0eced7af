//! AI personas that staff the agency.
//!
//! A [`Persona`] is a named team member with a role, a system prompt and a
//! running chat history. Replies come from a [`ChatBackend`] when one is
//! wired in; without one the persona falls back to its canned Portuguese
//! response so the dashboard stays usable unconfigured.

use crate::backend::{ChatBackend, ChatTurn};
use agencyzen_core::ClientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many trailing history turns are sent to the backend per round.
pub const HISTORY_WINDOW: usize = 10;

/// The specialty of a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Coordinates the team and signs off on deliverables.
    Manager,
    /// WhatsApp support and lead qualification.
    Whatsapp,
    /// Social media content creation.
    SocialMedia,
    /// Paid traffic and campaign management.
    Traffic,
}

impl AgentRole {
    /// Role title shown on the persona card.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Manager => "Coordenador",
            Self::Whatsapp => "Atendimento WhatsApp",
            Self::SocialMedia => "Social Media",
            Self::Traffic => "Tráfego Pago",
        }
    }
}

/// Whether a persona is taking work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Persona responds to messages and journeys.
    #[default]
    Active,
    /// Persona is on hold.
    Paused,
}

/// Generation parameters forwarded to the chat backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens per reply.
    pub max_tokens: u32,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// An AI team member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Stable short id, e.g. `whatsapp`.
    pub id: String,
    /// Display name, e.g. `Zap Zen`.
    pub name: String,
    /// Specialty.
    pub role: AgentRole,
    /// One-line description for the persona card.
    pub description: String,
    /// System prompt sent with every backend call.
    pub system_prompt: String,
    /// Emoji shown on the persona card.
    pub icon: String,
    /// Client this persona is dedicated to, if any.
    pub client_id: Option<ClientId>,
    /// Whether the persona is taking work.
    pub status: AgentStatus,
    /// Generation parameters.
    pub config: PersonaConfig,
    /// When the persona was created.
    pub created_at: DateTime<Utc>,
    /// Deliverables completed so far.
    pub tasks_completed: u32,
    /// Live chat history, not persisted.
    #[serde(skip)]
    pub history: Vec<ChatTurn>,
}

impl Persona {
    /// Creates an active persona with default generation parameters.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: AgentRole,
        description: impl Into<String>,
        system_prompt: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            description: description.into(),
            system_prompt: system_prompt.into(),
            icon: icon.into(),
            client_id: None,
            status: AgentStatus::Active,
            config: PersonaConfig::default(),
            created_at: Utc::now(),
            tasks_completed: 0,
            history: Vec::new(),
        }
    }

    /// Dedicates the persona to a client.
    #[must_use]
    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Overrides the generation parameters.
    #[must_use]
    pub fn with_config(mut self, config: PersonaConfig) -> Self {
        self.config = config;
        self
    }

    /// Puts the persona on hold.
    pub fn pause(&mut self) {
        self.status = AgentStatus::Paused;
    }

    /// Puts the persona back to work.
    pub fn resume(&mut self) {
        self.status = AgentStatus::Active;
    }

    /// Bumps the completed-deliverables counter.
    pub fn record_completed_task(&mut self) {
        self.tasks_completed += 1;
    }

    /// Runs one chat round.
    ///
    /// The user turn is recorded first. Without a backend the persona
    /// answers with its role fallback; a backend failure becomes an error
    /// string. Only successful backend replies are recorded as assistant
    /// turns.
    pub async fn process_message(
        &mut self,
        backend: Option<&dyn ChatBackend>,
        message: impl Into<String>,
    ) -> String {
        self.history.push(ChatTurn::user(message.into()));

        let Some(backend) = backend else {
            return self.fallback_response();
        };

        let start = self.history.len().saturating_sub(HISTORY_WINDOW);
        match backend
            .generate(&self.system_prompt, &self.history[start..], &self.config)
            .await
        {
            Ok(reply) => {
                self.history.push(ChatTurn::assistant(reply.clone()));
                reply
            }
            Err(err) => format!("Erro ao processar: {err}"),
        }
    }

    /// Canned acknowledgement used by the conversations screen.
    #[must_use]
    pub fn chat_ack(&self, message: &str) -> String {
        let topic: String = message.chars().take(50).collect();
        format!(
            "[{}] Entendi sua mensagem sobre \"{topic}...\". Vou processar isso para você. \
             Configure a API Key da OpenAI nas configurações para respostas reais.",
            self.name
        )
    }

    /// Clears the chat history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn fallback_response(&self) -> String {
        let name = &self.name;
        match self.role {
            AgentRole::Manager => format!(
                "[{name}] Vou coordenar essa tarefa com a equipe. Por favor, configure a API \
                 Key da OpenAI para respostas reais."
            ),
            AgentRole::Whatsapp => format!(
                "[{name}] Entendi sua mensagem. Configure a API Key para ativar o atendimento \
                 automático."
            ),
            AgentRole::SocialMedia => format!(
                "[{name}] Vou preparar o conteúdo. Configure a API Key para criação de posts."
            ),
            AgentRole::Traffic => format!(
                "[{name}] Analisando métricas. Configure a API Key para otimização de campanhas."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CannedBackend, ChatRole};
    use crate::error::ChatError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn whatsapp_persona() -> Persona {
        Persona::new(
            "whatsapp",
            "Zap Zen",
            AgentRole::Whatsapp,
            "Atendimento via WhatsApp",
            "Você é o Zap Zen.",
            "💬",
        )
    }

    /// Backend that records the window it was handed.
    #[derive(Default)]
    struct WindowProbe {
        seen: Mutex<Vec<ChatTurn>>,
    }

    #[async_trait]
    impl ChatBackend for WindowProbe {
        async fn generate(
            &self,
            _system_prompt: &str,
            turns: &[ChatTurn],
            _config: &PersonaConfig,
        ) -> Result<String, ChatError> {
            *self.seen.lock().unwrap() = turns.to_vec();
            Ok("ok".to_string())
        }
    }

    #[test]
    fn default_config_matches_the_dashboard() {
        let config = PersonaConfig::default();
        assert_eq!(config.model, "gpt-4-turbo");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 1000);
    }

    #[test]
    fn new_persona_starts_active_and_idle() {
        let persona = whatsapp_persona();
        assert_eq!(persona.status, AgentStatus::Active);
        assert_eq!(persona.tasks_completed, 0);
        assert!(persona.history.is_empty());
        assert!(persona.client_id.is_none());
    }

    #[test]
    fn role_titles_are_portuguese() {
        assert_eq!(AgentRole::Manager.title(), "Coordenador");
        assert_eq!(AgentRole::Whatsapp.title(), "Atendimento WhatsApp");
        assert_eq!(AgentRole::SocialMedia.title(), "Social Media");
        assert_eq!(AgentRole::Traffic.title(), "Tráfego Pago");
    }

    #[tokio::test]
    async fn fallback_reply_names_the_persona() {
        let mut persona = whatsapp_persona();
        let reply = persona.process_message(None, "Quanto custa?").await;

        assert!(reply.starts_with("[Zap Zen]"));
        assert!(reply.contains("API Key"));
        // only the user turn lands in history
        assert_eq!(persona.history.len(), 1);
        assert_eq!(persona.history[0].role, ChatRole::User);
    }

    #[tokio::test]
    async fn backend_reply_lands_in_history() {
        let mut persona = whatsapp_persona();
        let backend = CannedBackend::new(["Claro, posso ajudar!"]);

        let reply = persona.process_message(Some(&backend), "Olá").await;

        assert_eq!(reply, "Claro, posso ajudar!");
        assert_eq!(persona.history.len(), 2);
        assert_eq!(persona.history[1].role, ChatRole::Assistant);
        assert_eq!(persona.history[1].content, "Claro, posso ajudar!");
    }

    #[tokio::test]
    async fn backend_failure_becomes_an_error_reply() {
        let mut persona = whatsapp_persona();
        let backend = CannedBackend::new(Vec::<String>::new());

        let reply = persona.process_message(Some(&backend), "Olá").await;

        assert!(reply.starts_with("Erro ao processar:"));
        assert_eq!(persona.history.len(), 1);
    }

    #[tokio::test]
    async fn backend_sees_at_most_the_history_window() {
        let mut persona = whatsapp_persona();
        let probe = WindowProbe::default();

        for round in 0..8 {
            persona
                .process_message(Some(&probe), format!("mensagem {round}"))
                .await;
        }

        let seen = probe.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), HISTORY_WINDOW);
        // the newest user turn is always included
        assert_eq!(seen.last().unwrap().content, "mensagem 7");
        assert_eq!(persona.history.len(), 16);
    }

    #[test]
    fn chat_ack_truncates_the_message() {
        let persona = whatsapp_persona();
        let long = "a".repeat(80);
        let ack = persona.chat_ack(&long);

        assert!(ack.starts_with("[Zap Zen] Entendi sua mensagem sobre"));
        assert!(ack.contains(&format!("\"{}...\"", "a".repeat(50))));
    }

    #[test]
    fn clear_history_empties_the_log() {
        let mut persona = whatsapp_persona();
        persona.history.push(ChatTurn::user("oi"));
        persona.clear_history();
        assert!(persona.history.is_empty());
    }

    #[test]
    fn pause_and_resume_toggle_status() {
        let mut persona = whatsapp_persona();
        persona.pause();
        assert_eq!(persona.status, AgentStatus::Paused);
        persona.resume();
        assert_eq!(persona.status, AgentStatus::Active);
    }

    #[test]
    fn serde_skips_history_and_snake_cases_roles() {
        let mut persona = whatsapp_persona();
        persona.role = AgentRole::SocialMedia;
        persona.history.push(ChatTurn::user("oi"));

        let json = serde_json::to_string(&persona).expect("serialize");
        assert!(json.contains(r#""role":"social_media""#));
        assert!(!json.contains("history"));

        let parsed: Persona = serde_json::from_str(&json).expect("deserialize");
        assert!(parsed.history.is_empty());
        assert_eq!(parsed.role, AgentRole::SocialMedia);
    }
}
