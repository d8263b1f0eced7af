//! Client records for the agency dashboard.

use agencyzen_core::ClientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Relationship state of a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    /// Contract running.
    Active,
    /// Contract ended.
    Inactive,
    /// Onboarding not finished.
    #[default]
    Pending,
}

impl ClientStatus {
    /// Status label shown on the client card.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Ativo",
            Self::Inactive => "Inativo",
            Self::Pending => "Pendente",
        }
    }
}

/// A client of the agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Registry id.
    pub id: ClientId,
    /// Contact name.
    pub name: String,
    /// Company name.
    pub company: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Emoji avatar shown on the card.
    pub avatar: String,
    /// Relationship state.
    pub status: ClientStatus,
    /// Ids of the personas working this client.
    pub assigned_agents: BTreeSet<String>,
    /// When the client was registered.
    pub created_at: DateTime<Utc>,
    /// Last interaction with the client.
    pub last_contact: DateTime<Utc>,
}

impl Client {
    /// Creates a pending client with the default avatar and no assignments.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        company: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            name: name.into(),
            company: company.into(),
            email: email.into(),
            phone: phone.into(),
            avatar: "👤".to_string(),
            status: ClientStatus::Pending,
            assigned_agents: BTreeSet::new(),
            created_at: now,
            last_contact: now,
        }
    }

    /// Sets the avatar.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Sets the relationship state.
    #[must_use]
    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns true if this persona id is assigned to the client.
    #[must_use]
    pub fn has_agent(&self, agent: &str) -> bool {
        self.assigned_agents.contains(agent)
    }

    /// Marks the client as contacted now.
    pub fn touch_contact(&mut self) {
        self.last_contact = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_starts_pending_and_unassigned() {
        let client = Client::new("João", "Acme", "joao@acme.com", "+55 11 90000-0000");
        assert_eq!(client.status, ClientStatus::Pending);
        assert_eq!(client.avatar, "👤");
        assert!(client.assigned_agents.is_empty());
        assert_eq!(client.created_at, client.last_contact);
    }

    #[test]
    fn status_labels_are_portuguese() {
        assert_eq!(ClientStatus::Active.label(), "Ativo");
        assert_eq!(ClientStatus::Inactive.label(), "Inativo");
        assert_eq!(ClientStatus::Pending.label(), "Pendente");
    }

    #[test]
    fn touch_contact_advances_the_timestamp() {
        let mut client = Client::new("João", "Acme", "joao@acme.com", "");
        let registered = client.last_contact;

        std::thread::sleep(std::time::Duration::from_millis(1));
        client.touch_contact();

        assert!(client.last_contact > registered);
        assert_eq!(client.created_at, registered);
    }

    #[test]
    fn client_serialization_roundtrip() {
        let mut client = Client::new("Maria", "Loja Criativa", "maria@loja.com", "+55 21 90000")
            .with_avatar("👩‍💻")
            .with_status(ClientStatus::Active);
        client.assigned_agents.insert("social".to_string());

        let json = serde_json::to_string(&client).expect("serialize");
        assert!(json.contains(r#""status":"active""#));

        let parsed: Client = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(client, parsed);
    }
}
