//! Bridges journey agent steps to the persona roster.

use std::sync::Arc;

use agencyzen_agent::{AgentRoster, ChatBackend};
use agencyzen_flow::{AgentInvoker, EngineError};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Roster handle shared between the engine and the rest of the console.
pub type SharedRoster = Arc<Mutex<AgentRoster>>;

/// Resolves agent steps against a shared [`AgentRoster`].
///
/// Personas answer through the chat backend when one is wired in and
/// fall back to their canned replies otherwise.
pub struct RosterInvoker {
    roster: SharedRoster,
    backend: Option<Arc<dyn ChatBackend>>,
}

impl RosterInvoker {
    pub fn new(roster: SharedRoster, backend: Option<Arc<dyn ChatBackend>>) -> Self {
        Self { roster, backend }
    }
}

#[async_trait]
impl AgentInvoker for RosterInvoker {
    async fn invoke(&self, agent: &str, message: &str) -> Result<String, EngineError> {
        let mut roster = self.roster.lock().await;
        let Some(persona) = roster.get_mut(agent) else {
            return Err(EngineError::UnknownAgent {
                agent: agent.to_string(),
            });
        };
        Ok(persona
            .process_message(self.backend.as_deref(), message)
            .await)
    }
}
