//! In-memory persona registry.

use crate::error::AgentError;
use crate::persona::{AgentRole, Persona};

/// The agency's personas, in registration order.
#[derive(Debug, Clone, Default)]
pub struct AgentRoster {
    personas: Vec<Persona>,
}

impl AgentRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a persona, replacing any existing one with the same id.
    pub fn register(&mut self, persona: Persona) {
        if let Some(existing) = self.personas.iter_mut().find(|p| p.id == persona.id) {
            *existing = persona;
        } else {
            self.personas.push(persona);
        }
    }

    /// Looks up a persona by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    /// Looks up a persona by id for mutation.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Persona> {
        self.personas.iter_mut().find(|p| p.id == id)
    }

    /// Replaces an existing persona.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::AgentNotFound`] if no persona has this id.
    pub fn update(&mut self, persona: Persona) -> Result<(), AgentError> {
        match self.personas.iter_mut().find(|p| p.id == persona.id) {
            Some(existing) => {
                *existing = persona;
                Ok(())
            }
            None => Err(AgentError::AgentNotFound {
                agent_id: persona.id,
            }),
        }
    }

    /// Removes a persona and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::AgentNotFound`] if no persona has this id.
    pub fn remove(&mut self, id: &str) -> Result<Persona, AgentError> {
        match self.personas.iter().position(|p| p.id == id) {
            Some(index) => Ok(self.personas.remove(index)),
            None => Err(AgentError::AgentNotFound {
                agent_id: id.to_string(),
            }),
        }
    }

    /// All personas in registration order.
    #[must_use]
    pub fn list(&self) -> &[Persona] {
        &self.personas
    }

    /// Number of registered personas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Returns true if no persona is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

/// The four personas the dashboard ships with.
#[must_use]
pub fn default_roster() -> AgentRoster {
    let mut roster = AgentRoster::new();
    roster.register(Persona::new(
        "manager",
        "Gerente Geral",
        AgentRole::Manager,
        "Coordena todos os agentes e aprova entregas",
        "Você é o Gerente Geral da agência. Seu trabalho é coordenar os outros agentes, \
         aprovar posts e anúncios antes de serem publicados, e garantir que tudo esteja \
         alinhado com a identidade de cada cliente.",
        "👔",
    ));
    roster.register(Persona::new(
        "whatsapp",
        "Zap Zen",
        AgentRole::Whatsapp,
        "Atendimento e qualificação de leads via WhatsApp",
        "Você é o Zap Zen, especialista em atendimento ao cliente via WhatsApp. Seja \
         cordial, objetivo e sempre tente qualificar o lead perguntando sobre suas \
         necessidades.",
        "💬",
    ));
    roster.register(Persona::new(
        "social",
        "Social Zen",
        AgentRole::SocialMedia,
        "Criação de posts e conteúdo visual",
        "Você é o Social Zen, especialista em social media. Crie legendas engajadoras, \
         sugira hashtags relevantes e trabalhe com a identidade visual de cada cliente.",
        "📱",
    ));
    roster.register(Persona::new(
        "traffic",
        "Traffic Master",
        AgentRole::Traffic,
        "Gestão de anúncios e campanhas",
        "Você é o Traffic Master, especialista em tráfego pago. Crie campanhas otimizadas, \
         sugira segmentações e sempre peça aprovação do Gerente antes de publicar.",
        "📊",
    ));
    roster
}
