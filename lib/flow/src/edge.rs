//! Edge types for journey graphs.
//!
//! Edges connect a node's output handle to another node's input. Only
//! condition nodes carry a branch discriminator on their outgoing
//! edges; every other kind has a single unconditional output.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A unique identifier for an edge within a journey.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Creates a new unique edge ID.
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

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The branch an edge leaves a condition node on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
}

impl Branch {
    /// The handle name this branch corresponds to.
    #[must_use]
    pub fn handle(&self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.handle())
    }
}

/// An edge between two nodes in a journey graph.
///
/// Endpoints live in the graph structure itself; the weight carries
/// only the edge's identity and its branch discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// Branch discriminator; `Some` only for edges leaving a
    /// condition node.
    pub branch: Option<Branch>,
}

impl Edge {
    /// Creates an unconditional edge with a fresh ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: EdgeId::fresh(),
            branch: None,
        }
    }

    /// Creates a branch edge with a fresh ID.
    #[must_use]
    pub fn on_branch(branch: Branch) -> Self {
        Self {
            id: EdgeId::fresh(),
            branch: Some(branch),
        }
    }

    /// Creates an edge with a specific ID.
    #[must_use]
    pub fn with_id(id: impl Into<EdgeId>, branch: Option<Branch>) -> Self {
        Self {
            id: id.into(),
            branch,
        }
    }
}

impl Default for Edge {
    fn default() -> Self {
        Self::new()
    }
}

/// A candidate connection, as described by a connect gesture in the
/// editor: source node, target node, and the branch when the source
/// is a condition node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The source node ID.
    pub source: NodeId,
    /// The target node ID.
    pub target: NodeId,
    /// Branch selector, required when the source is a condition.
    pub branch: Option<Branch>,
}

impl Connection {
    /// Creates an unconditional connection.
    #[must_use]
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            branch: None,
        }
    }

    /// Creates a connection leaving a condition node on a branch.
    #[must_use]
    pub fn on_branch(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        branch: Branch,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            branch: Some(branch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_edge_ids_are_unique() {
        let a = Edge::new();
        let b = Edge::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn branch_serializes_as_handle_name() {
        let json = serde_json::to_value(Branch::True).expect("serialize");
        assert_eq!(json, "true");
        let json = serde_json::to_value(Branch::False).expect("serialize");
        assert_eq!(json, "false");
    }

    #[test]
    fn connection_on_branch() {
        let connection = Connection::on_branch("3", "4", Branch::True);
        assert_eq!(connection.source.as_str(), "3");
        assert_eq!(connection.target.as_str(), "4");
        assert_eq!(connection.branch, Some(Branch::True));
    }

    #[test]
    fn edge_serde_roundtrip() {
        let edge = Edge::with_id("e3-5", Some(Branch::False));
        let json = serde_json::to_string(&edge).expect("serialize");
        let parsed: Edge = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(edge, parsed);
    }
}
