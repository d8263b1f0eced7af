//! In-memory client registry.

use crate::client::Client;
use crate::error::ClientError;
use agencyzen_core::ClientId;

/// Persona ids clients can be assigned to.
pub const ASSIGNABLE_AGENTS: [&str; 3] = ["whatsapp", "social", "traffic"];

/// The agency's clients, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: Vec<Client>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] when the name or email is
    /// blank.
    pub fn add(&mut self, client: Client) -> Result<ClientId, ClientError> {
        Self::validate(&client)?;
        let id = client.id;
        self.clients.push(client);
        Ok(id)
    }

    /// Looks up a client by id.
    #[must_use]
    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Looks up a client by id for mutation.
    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.id == id)
    }

    /// Replaces an existing client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] when the name or email is
    /// blank, or [`ClientError::ClientNotFound`] if no client has this id.
    pub fn update(&mut self, client: Client) -> Result<(), ClientError> {
        Self::validate(&client)?;
        match self.clients.iter_mut().find(|c| c.id == client.id) {
            Some(existing) => {
                *existing = client;
                Ok(())
            }
            None => Err(ClientError::ClientNotFound {
                client_id: client.id,
            }),
        }
    }

    /// Removes a client and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ClientNotFound`] if no client has this id.
    pub fn remove(&mut self, id: ClientId) -> Result<Client, ClientError> {
        match self.clients.iter().position(|c| c.id == id) {
            Some(index) => Ok(self.clients.remove(index)),
            None => Err(ClientError::ClientNotFound { client_id: id }),
        }
    }

    /// All clients in registration order.
    #[must_use]
    pub fn list(&self) -> &[Client] {
        &self.clients
    }

    /// Case-insensitive search over contact and company names.
    ///
    /// An empty term matches everyone.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Client> {
        let needle = term.to_lowercase();
        self.clients
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.company.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Toggles a persona assignment, returning whether it is now assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ClientNotFound`] if no client has this id.
    pub fn toggle_agent(&mut self, id: ClientId, agent: &str) -> Result<bool, ClientError> {
        let client = self
            .get_mut(id)
            .ok_or(ClientError::ClientNotFound { client_id: id })?;
        if client.assigned_agents.remove(agent) {
            Ok(false)
        } else {
            client.assigned_agents.insert(agent.to_string());
            Ok(true)
        }
    }

    /// Assigns a persona to a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ClientNotFound`] if no client has this id.
    pub fn assign(&mut self, id: ClientId, agent: &str) -> Result<(), ClientError> {
        let client = self
            .get_mut(id)
            .ok_or(ClientError::ClientNotFound { client_id: id })?;
        client.assigned_agents.insert(agent.to_string());
        Ok(())
    }

    /// Removes a persona assignment from a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ClientNotFound`] if no client has this id.
    pub fn unassign(&mut self, id: ClientId, agent: &str) -> Result<(), ClientError> {
        let client = self
            .get_mut(id)
            .ok_or(ClientError::ClientNotFound { client_id: id })?;
        client.assigned_agents.remove(agent);
        Ok(())
    }

    /// Number of registered clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no client is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn validate(client: &Client) -> Result<(), ClientError> {
        if client.name.trim().is_empty() {
            return Err(ClientError::MissingField {
                field: "name".to_string(),
            });
        }
        if client.email.trim().is_empty() {
            return Err(ClientError::MissingField {
                field: "email".to_string(),
            });
        }
        Ok(())
    }
}
