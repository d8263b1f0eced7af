//! Journey definition types.
//!
//! A journey is a named automation built around a [`FlowGraph`]:
//! metadata, the graph itself, and a status that run outcomes drive.

use crate::document::FlowDocument;
use crate::error::DocumentError;
use crate::graph::FlowGraph;
use agencyzen_core::FlowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a journey, driven by its runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    /// Not yet activated, or deliberately switched off.
    Inactive,
    /// A run is in progress.
    Running,
    /// Activated; the last run (if any) completed.
    Active,
    /// The last run failed.
    Error,
}

impl FlowStatus {
    /// Display label, as shown on the dashboard.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inactive => "Inativo",
            Self::Running => "Executando",
            Self::Active => "Ativo",
            Self::Error => "Erro",
        }
    }
}

impl std::fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Inactive => "inactive",
            Self::Running => "running",
            Self::Active => "active",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// A complete journey definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    /// Unique identifier for this journey.
    pub id: FlowId,
    /// Human-readable name.
    pub name: String,
    /// Description of what this journey does.
    pub description: Option<String>,
    /// The node graph.
    pub graph: FlowGraph,
    /// Current status.
    pub status: FlowStatus,
    /// When this journey was created.
    pub created_at: DateTime<Utc>,
    /// When this journey was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Flow {
    /// Creates a new empty journey with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(FlowId::new(), name)
    }

    /// Creates a journey with a specific ID.
    #[must_use]
    pub fn with_id(id: FlowId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            description: None,
            graph: FlowGraph::new(),
            status: FlowStatus::Inactive,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the graph.
    #[must_use]
    pub fn with_graph(mut self, graph: FlowGraph) -> Self {
        self.graph = graph;
        self
    }

    /// Switches the journey on.
    pub fn activate(&mut self) {
        self.status = FlowStatus::Active;
        self.touch();
    }

    /// Switches the journey off.
    pub fn deactivate(&mut self) {
        self.status = FlowStatus::Inactive;
        self.touch();
    }

    /// Records that a run has started.
    pub fn run_started(&mut self) {
        self.status = FlowStatus::Running;
        self.touch();
    }

    /// Records that the current run completed.
    pub fn run_completed(&mut self) {
        self.status = FlowStatus::Active;
        self.touch();
    }

    /// Records that the current run failed.
    pub fn run_failed(&mut self) {
        self.status = FlowStatus::Error;
        self.touch();
    }

    /// Validates the journey graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph violates a structural invariant.
    pub fn validate(&self) -> Result<(), crate::error::GraphError> {
        self.graph.validate()
    }

    /// Snapshots the journey into a transferable document.
    #[must_use]
    pub fn to_document(&self) -> FlowDocument {
        FlowDocument::from_graph(&self.name, &self.graph)
    }

    /// Builds a journey from a document, assigning a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not import cleanly.
    pub fn from_document(document: FlowDocument) -> Result<Self, DocumentError> {
        let (name, graph) = document.into_graph()?;
        Ok(Self::new(name).with_graph(graph))
    }

    /// Marks the journey as updated (bumps `updated_at`).
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Summary information about a journey (for listings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    /// Journey ID.
    pub id: FlowId,
    /// Journey name.
    pub name: String,
    /// Description, if any.
    pub description: Option<String>,
    /// Current status.
    pub status: FlowStatus,
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Number of edges in the graph.
    pub edge_count: usize,
    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Flow> for FlowSummary {
    fn from(flow: &Flow) -> Self {
        Self {
            id: flow.id,
            name: flow.name.clone(),
            description: flow.description.clone(),
            status: flow.status,
            node_count: flow.graph.node_count(),
            edge_count: flow.graph.edge_count(),
            updated_at: flow.updated_at,
        }
    }
}
