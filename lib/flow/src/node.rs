//! Journey node types and per-kind configuration.
//!
//! Nodes are the steps of a journey. Each node has:
//! - A unique ID within the journey
//! - A kind from a closed set (trigger, message, condition, ...)
//! - A canvas position (presentational only)
//! - Configuration specific to its kind

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A unique identifier for a node within a journey.
///
/// Stored as a string so caller-chosen ids (the canned journey uses
/// `"1"`..`"6"`) and generated ids can coexist in one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a new unique node ID.
    #[must_use]
    pub fn fresh() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a journey node. Closed enumeration: the palette only
/// creates new nodes of these kinds and never retypes existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry point reacting to an event (e.g. an inbound message).
    Trigger,
    /// Sends a text message, with `{variable}` interpolation.
    Message,
    /// Routes to a true or false branch based on a predicate.
    Condition,
    /// Hands the input to an AI persona and forwards its response.
    Agent,
    /// Waits a number of seconds before continuing.
    Delay,
    /// Attaches a label to the data flowing through.
    Tag,
    /// Terminates the journey.
    End,
}

impl NodeKind {
    /// Default display label for this kind.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Trigger => "Evento",
            Self::Message => "Enviar Mensagem",
            Self::Condition => "Condição",
            Self::Agent => "Chamar Agente",
            Self::Delay => "Aguardar",
            Self::Tag => "Adicionar Etiqueta",
            Self::End => "Fim",
        }
    }

    /// Names of the output handles this kind exposes.
    #[must_use]
    pub fn output_handles(&self) -> &'static [&'static str] {
        match self {
            Self::Condition => &["true", "false"],
            Self::Agent => &["response"],
            Self::End => &[],
            _ => &["next"],
        }
    }

    /// Whether this kind accepts incoming edges. Only triggers do not.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::Trigger)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Trigger => "trigger",
            Self::Message => "message",
            Self::Condition => "condition",
            Self::Agent => "agent",
            Self::Delay => "delay",
            Self::Tag => "tag",
            Self::End => "end",
        };
        write!(f, "{name}")
    }
}

/// A 2D canvas position. Mutable via drag, purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a position from coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A predicate evaluated by condition nodes.
///
/// Comparison is case-insensitive on both sides, matching how the
/// journey runner stringifies and lowercases its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// True when the input contains the value.
    Contains { value: String },
    /// True when the input equals the value.
    Equals { value: String },
    /// True when the input is non-blank.
    NotEmpty,
}

impl Predicate {
    /// Evaluates the predicate against an input string.
    #[must_use]
    pub fn evaluate(&self, input: &str) -> bool {
        let input = input.to_lowercase();
        match self {
            Self::Contains { value } => input.contains(&value.to_lowercase()),
            Self::Equals { value } => input == value.to_lowercase(),
            Self::NotEmpty => !input.trim().is_empty(),
        }
    }
}

/// Configuration for a node, varying by kind.
///
/// A tagged union rather than a free-form map, so matching on it is
/// exhaustive when new behavior is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeConfig {
    /// Event that starts the journey.
    Trigger {
        /// Event description (e.g. "Mensagem recebida").
        event: String,
    },
    /// Message text to send, supports `{variable}` placeholders.
    Message { text: String },
    /// Predicate selecting the true or false branch.
    Condition { predicate: Predicate },
    /// AI persona id to invoke.
    Agent { agent: String },
    /// Seconds to wait.
    Delay { seconds: u64 },
    /// Label to attach to the data flowing through.
    Tag { tag: String },
    /// Terminal step.
    End,
}

impl NodeConfig {
    /// Returns the node kind this configuration belongs to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Trigger { .. } => NodeKind::Trigger,
            Self::Message { .. } => NodeKind::Message,
            Self::Condition { .. } => NodeKind::Condition,
            Self::Agent { .. } => NodeKind::Agent,
            Self::Delay { .. } => NodeKind::Delay,
            Self::Tag { .. } => NodeKind::Tag,
            Self::End => NodeKind::End,
        }
    }

    /// Returns the palette default configuration for a kind.
    #[must_use]
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Trigger => Self::Trigger {
                event: "Mensagem recebida".to_string(),
            },
            NodeKind::Message => Self::Message {
                text: String::new(),
            },
            NodeKind::Condition => Self::Condition {
                predicate: Predicate::NotEmpty,
            },
            NodeKind::Agent => Self::Agent {
                agent: String::new(),
            },
            NodeKind::Delay => Self::Delay { seconds: 1 },
            NodeKind::Tag => Self::Tag { tag: String::new() },
            NodeKind::End => Self::End,
        }
    }
}

/// A journey node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node within the journey.
    pub id: NodeId,
    /// Short display name.
    pub label: String,
    /// Optional free-text annotation shown under the label.
    pub description: Option<String>,
    /// Canvas position.
    pub position: Position,
    /// Kind-specific configuration (determines the node kind).
    pub config: NodeConfig,
}

impl Node {
    /// Creates a new node with a fresh unique ID and the kind's
    /// default label and configuration.
    #[must_use]
    pub fn new(kind: NodeKind, position: Position) -> Self {
        Self {
            id: NodeId::fresh(),
            label: kind.label().to_string(),
            description: None,
            position,
            config: NodeConfig::default_for(kind),
        }
    }

    /// Creates a node with a specific ID and configuration.
    #[must_use]
    pub fn with_id(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        position: Position,
        config: NodeConfig,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            position,
            config,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }

    /// Names of the output handles this node exposes.
    #[must_use]
    pub fn output_handles(&self) -> &'static [&'static str] {
        self.kind().output_handles()
    }

    /// Whether this node accepts incoming edges.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.kind().accepts_input()
    }
}
