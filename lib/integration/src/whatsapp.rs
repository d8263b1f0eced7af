//! Simulated WhatsApp connection lifecycle and message log.
//!
//! Nothing here talks to the real WhatsApp network. The connection walks
//! the same states a real pairing would (QR generation, scan, connected)
//! and records traffic in memory so the rest of the dashboard can be
//! exercised end to end:
//!
//! - [`WhatsAppConnection`] owns the state machine, the message log and
//!   an optional inbound-message handler.
//! - [`WhatsAppManager`] keys independent connections by instance id.
//! - [`SessionData`] is the piece persisted to disk between runs.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use agencyzen_core::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::IntegrationError;

/// Where a connection sits in the pairing lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// A QR code was issued and is waiting to be scanned.
    WaitingScan,
    Connected,
}

/// The part of a connection that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub phone: String,
}

impl SessionData {
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
        }
    }
}

/// Which way a message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

/// Delivery status recorded on the wire log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireStatus {
    Sent,
    Received,
}

/// One message on the connection's wire log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub id: MessageId,
    pub direction: Direction,
    /// The remote phone number this message went to or came from.
    pub peer: String,
    pub content: String,
    pub at: DateTime<Utc>,
    pub status: WireStatus,
}

/// Snapshot of a connection for status listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub phone: Option<String>,
    pub messages_count: usize,
}

/// Callback invoked for every simulated inbound message.
pub type MessageHandler = Box<dyn Fn(&WireMessage) + Send + Sync>;

/// A single simulated WhatsApp connection.
#[derive(Default)]
pub struct WhatsAppConnection {
    state: ConnectionState,
    phone: Option<String>,
    qr_code: Option<String>,
    messages: Vec<WireMessage>,
    handler: Option<MessageHandler>,
    session: Option<SessionData>,
}

impl fmt::Debug for WhatsAppConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsAppConnection")
            .field("state", &self.state)
            .field("phone", &self.phone)
            .field("messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}

impl WhatsAppConnection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    #[must_use]
    pub fn qr_code(&self) -> Option<&str> {
        self.qr_code.as_deref()
    }

    /// Issues a fresh QR payload and parks the connection until it is
    /// scanned. The payload is a base64-encoded pairing URL carrying a
    /// one-time session id.
    pub fn generate_qr(&mut self) -> String {
        use base64::Engine;

        let payload = format!("whatsapp://connect?session={}", Ulid::new());
        let encoded = base64::engine::general_purpose::STANDARD.encode(payload.as_bytes());
        self.qr_code = Some(encoded.clone());
        self.state = ConnectionState::WaitingScan;
        encoded
    }

    /// Completes pairing with a known session, as if the QR code had just
    /// been scanned by the given phone.
    pub fn connect_with_session(&mut self, session: SessionData) {
        self.phone = Some(session.phone.clone());
        self.session = Some(session);
        self.qr_code = None;
        self.state = ConnectionState::Connected;
    }

    /// Drops the pairing. The message log is kept.
    pub fn disconnect(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.phone = None;
        self.session = None;
        self.qr_code = None;
    }

    /// Records an outbound message. Fails unless the connection is paired.
    pub fn send_message(
        &mut self,
        to: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&WireMessage, IntegrationError> {
        if self.state != ConnectionState::Connected {
            return Err(IntegrationError::NotConnected);
        }
        self.messages.push(WireMessage {
            id: MessageId::new(),
            direction: Direction::Outbound,
            peer: to.into(),
            content: content.into(),
            at: Utc::now(),
            status: WireStatus::Sent,
        });
        let index = self.messages.len() - 1;
        Ok(&self.messages[index])
    }

    /// Records an inbound message and fires the registered handler, as if
    /// the remote peer had just written in.
    pub fn simulate_incoming(
        &mut self,
        from: impl Into<String>,
        content: impl Into<String>,
    ) -> &WireMessage {
        self.messages.push(WireMessage {
            id: MessageId::new(),
            direction: Direction::Inbound,
            peer: from.into(),
            content: content.into(),
            at: Utc::now(),
            status: WireStatus::Received,
        });
        let index = self.messages.len() - 1;
        if let Some(handler) = &self.handler {
            handler(&self.messages[index]);
        }
        &self.messages[index]
    }

    /// Registers the callback invoked for every simulated inbound message.
    pub fn set_message_handler(&mut self, handler: MessageHandler) {
        self.handler = Some(handler);
    }

    /// The full wire log, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[WireMessage] {
        &self.messages
    }

    /// The wire log restricted to one remote phone number.
    #[must_use]
    pub fn messages_with(&self, peer: &str) -> Vec<&WireMessage> {
        self.messages
            .iter()
            .filter(|message| message.peer == peer)
            .collect()
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            connected: self.state == ConnectionState::Connected,
            phone: self.phone.clone(),
            messages_count: self.messages.len(),
        }
    }

    /// Persists the current session to `path`. Without an active session
    /// this is a no-op.
    pub fn save_session(&self, path: &Path) -> Result<(), IntegrationError> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(session).map_err(|err| {
            IntegrationError::SessionIo {
                reason: err.to_string(),
            }
        })?;
        fs::write(path, json).map_err(|err| IntegrationError::SessionIo {
            reason: err.to_string(),
        })?;
        Ok(())
    }

    /// Restores a previously saved session and reconnects with it. Returns
    /// `false` when no session file exists at `path`.
    pub fn load_session(&mut self, path: &Path) -> Result<bool, IntegrationError> {
        if !path.exists() {
            return Ok(false);
        }
        let raw = fs::read_to_string(path).map_err(|err| IntegrationError::SessionIo {
            reason: err.to_string(),
        })?;
        let session: SessionData =
            serde_json::from_str(&raw).map_err(|err| IntegrationError::SessionIo {
                reason: err.to_string(),
            })?;
        self.connect_with_session(session);
        Ok(true)
    }
}

/// Keeps one [`WhatsAppConnection`] per instance id.
#[derive(Debug, Default)]
pub struct WhatsAppManager {
    connections: HashMap<String, WhatsAppConnection>,
}

impl WhatsAppManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the connection for `instance_id`, creating it on first use.
    pub fn create(&mut self, instance_id: impl Into<String>) -> &mut WhatsAppConnection {
        self.connections
            .entry(instance_id.into())
            .or_insert_with(WhatsAppConnection::new)
    }

    #[must_use]
    pub fn get(&self, instance_id: &str) -> Option<&WhatsAppConnection> {
        self.connections.get(instance_id)
    }

    pub fn get_mut(&mut self, instance_id: &str) -> Option<&mut WhatsAppConnection> {
        self.connections.get_mut(instance_id)
    }

    pub fn remove(&mut self, instance_id: &str) -> Option<WhatsAppConnection> {
        self.connections.remove(instance_id)
    }

    /// Status of every known instance, sorted by instance id.
    #[must_use]
    pub fn list(&self) -> Vec<(&str, ConnectionStatus)> {
        let mut statuses: Vec<_> = self
            .connections
            .iter()
            .map(|(id, connection)| (id.as_str(), connection.status()))
            .collect();
        statuses.sort_by_key(|(id, _)| *id);
        statuses
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use base64::Engine;

    use super::*;

    #[test]
    fn qr_payload_is_a_pairing_url() {
        let mut connection = WhatsAppConnection::new();
        let encoded = connection.generate_qr();

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&encoded)
            .unwrap();
        let payload = String::from_utf8(decoded).unwrap();
        assert!(payload.starts_with("whatsapp://connect?session="));
        assert_eq!(connection.state(), ConnectionState::WaitingScan);
        assert_eq!(connection.qr_code(), Some(encoded.as_str()));
    }

    #[test]
    fn send_requires_a_paired_connection() {
        let mut connection = WhatsAppConnection::new();
        let err = connection.send_message("+55 11 99999-0001", "oi").unwrap_err();
        assert_eq!(err, IntegrationError::NotConnected);
    }

    #[test]
    fn connect_then_send_records_the_message() {
        let mut connection = WhatsAppConnection::new();
        connection.generate_qr();
        connection.connect_with_session(SessionData::new("+55 11 98888-0000"));

        let message = connection
            .send_message("+55 11 99999-0001", "Olá! Tudo bem?")
            .unwrap();
        assert_eq!(message.direction, Direction::Outbound);
        assert_eq!(message.status, WireStatus::Sent);
        assert_eq!(message.peer, "+55 11 99999-0001");

        let status = connection.status();
        assert!(status.connected);
        assert_eq!(status.phone.as_deref(), Some("+55 11 98888-0000"));
        assert_eq!(status.messages_count, 1);
        assert!(connection.qr_code().is_none());
    }

    #[test]
    fn wire_log_filters_by_peer() {
        let mut connection = WhatsAppConnection::new();
        connection.connect_with_session(SessionData::new("+55 11 98888-0000"));
        connection.send_message("+55 11 99999-0001", "primeira").unwrap();
        connection.send_message("+55 11 99999-0002", "segunda").unwrap();
        connection.simulate_incoming("+55 11 99999-0001", "resposta");

        assert_eq!(connection.messages().len(), 3);
        let with_first = connection.messages_with("+55 11 99999-0001");
        assert_eq!(with_first.len(), 2);
        assert!(
            with_first
                .iter()
                .all(|message| message.peer == "+55 11 99999-0001")
        );
    }

    #[test]
    fn incoming_messages_fire_the_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let probe = Arc::clone(&seen);

        let mut connection = WhatsAppConnection::new();
        connection.set_message_handler(Box::new(move |message| {
            probe.lock().unwrap().push(message.content.clone());
        }));

        let message = connection.simulate_incoming("+55 11 99999-0001", "oi, ainda tem vaga?");
        assert_eq!(message.direction, Direction::Inbound);
        assert_eq!(message.status, WireStatus::Received);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["oi, ainda tem vaga?".to_string()]
        );
    }

    #[test]
    fn disconnect_clears_pairing_but_keeps_the_log() {
        let mut connection = WhatsAppConnection::new();
        connection.connect_with_session(SessionData::new("+55 11 98888-0000"));
        connection.send_message("+55 11 99999-0001", "oi").unwrap();

        connection.disconnect();
        assert_eq!(connection.state(), ConnectionState::Disconnected);
        assert!(connection.phone().is_none());
        assert_eq!(connection.messages().len(), 1);
        assert!(!connection.status().connected);
    }

    #[test]
    fn session_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut connection = WhatsAppConnection::new();
        // Nothing to save yet, so no file appears.
        connection.save_session(&path).unwrap();
        assert!(!path.exists());

        connection.connect_with_session(SessionData::new("+55 11 98888-0000"));
        connection.save_session(&path).unwrap();

        let mut restored = WhatsAppConnection::new();
        assert!(restored.load_session(&path).unwrap());
        assert_eq!(restored.state(), ConnectionState::Connected);
        assert_eq!(restored.phone(), Some("+55 11 98888-0000"));
    }

    #[test]
    fn loading_a_missing_session_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut connection = WhatsAppConnection::new();
        assert!(!connection.load_session(&dir.path().join("absent.json")).unwrap());
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn manager_tracks_instances_by_id() {
        let mut manager = WhatsAppManager::new();
        manager
            .create("client-b")
            .connect_with_session(SessionData::new("+55 21 97777-0000"));
        manager.create("client-a");

        assert_eq!(manager.len(), 2);
        let listed = manager.list();
        assert_eq!(listed[0].0, "client-a");
        assert_eq!(listed[1].0, "client-b");
        assert!(!listed[0].1.connected);
        assert!(listed[1].1.connected);

        assert!(manager.remove("client-a").is_some());
        assert!(manager.get("client-a").is_none());
        assert_eq!(manager.len(), 1);
    }
}
