//! Error types for the flow crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `GraphError`: graph mutations (insert, connect, validate)
//! - `DocumentError`: import of serialized journey documents
//! - `EngineError`: journey execution failures
//! - `StoreError`: flow store lookups
//! - `FlowError`: umbrella for callers that handle all of the above

use crate::edge::{Branch, EdgeId};
use crate::node::NodeId;
use agencyzen_core::FlowId;
use std::fmt;

/// Errors from graph operations.
///
/// These errors contain only information available at the graph layer.
/// Journey-level context (like the flow id) should be added by the
/// caller using `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Node with the given ID was not found in the graph.
    NodeNotFound { node_id: NodeId },
    /// A node with the given ID already exists in the graph.
    DuplicateNodeId { node_id: NodeId },
    /// The source node exposes no output handles (end nodes).
    NoOutputHandle { node_id: NodeId },
    /// The target node accepts no incoming edges (trigger nodes).
    NoInputHandle { node_id: NodeId },
    /// A connection out of a condition node needs a branch selector.
    BranchRequired { node_id: NodeId },
    /// A branch selector was given for a non-condition source.
    BranchNotAllowed { node_id: NodeId },
    /// A condition node has more than one edge on the same branch.
    DuplicateBranch { node_id: NodeId, branch: Branch },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => {
                write!(f, "node not found: {node_id}")
            }
            Self::DuplicateNodeId { node_id } => {
                write!(f, "duplicate node id: {node_id}")
            }
            Self::NoOutputHandle { node_id } => {
                write!(f, "node {node_id} has no output handles")
            }
            Self::NoInputHandle { node_id } => {
                write!(f, "node {node_id} does not accept incoming edges")
            }
            Self::BranchRequired { node_id } => {
                write!(f, "connection from condition node {node_id} requires a branch")
            }
            Self::BranchNotAllowed { node_id } => {
                write!(f, "connection from node {node_id} cannot carry a branch")
            }
            Self::DuplicateBranch { node_id, branch } => {
                write!(
                    f,
                    "condition node {node_id} has multiple edges on branch {branch}"
                )
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Errors importing a serialized journey document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The document version is not supported.
    UnsupportedVersion { version: u32 },
    /// Two nodes in the document share an id.
    DuplicateNodeId { node_id: NodeId },
    /// An edge references a node that is not in the document.
    DanglingEdge { edge_id: EdgeId, node_id: NodeId },
    /// An edge attaches to a node that exposes no handle for it
    /// (out of an end node, or into a trigger node).
    IllegalEndpoint { edge_id: EdgeId, node_id: NodeId },
    /// An edge carries a branch inconsistent with its source kind.
    InvalidBranch { edge_id: EdgeId, node_id: NodeId },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported document version: {version}")
            }
            Self::DuplicateNodeId { node_id } => {
                write!(f, "duplicate node id in document: {node_id}")
            }
            Self::DanglingEdge { edge_id, node_id } => {
                write!(f, "edge {edge_id} references missing node {node_id}")
            }
            Self::IllegalEndpoint { edge_id, node_id } => {
                write!(f, "edge {edge_id} cannot attach to node {node_id}")
            }
            Self::InvalidBranch { edge_id, node_id } => {
                write!(
                    f,
                    "edge {edge_id} has an invalid branch for source node {node_id}"
                )
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Errors during journey execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The graph has no trigger node to start from.
    NoTriggerNode,
    /// An agent node names a persona the invoker does not know.
    UnknownAgent { agent: String },
    /// The run exceeded the configured step limit (cyclic journey).
    StepLimitExceeded { limit: usize },
    /// A node handler failed.
    NodeFailed { node_id: NodeId, reason: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTriggerNode => write!(f, "no trigger node found"),
            Self::UnknownAgent { agent } => {
                write!(f, "unknown agent: {agent}")
            }
            Self::StepLimitExceeded { limit } => {
                write!(f, "step limit exceeded after {limit} steps")
            }
            Self::NodeFailed { node_id, reason } => {
                write!(f, "node {node_id} failed: {reason}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Errors from flow store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Flow not found.
    FlowNotFound { flow_id: FlowId },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlowNotFound { flow_id } => {
                write!(f, "flow not found: {flow_id}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Umbrella error for callers spanning graph, document, engine, and
/// store layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Graph operation error.
    Graph(GraphError),
    /// Document import error.
    Document(DocumentError),
    /// Execution error.
    Engine(EngineError),
    /// Store error.
    Store(StoreError),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph(e) => write!(f, "graph error: {e}"),
            Self::Document(e) => write!(f, "document error: {e}"),
            Self::Engine(e) => write!(f, "engine error: {e}"),
            Self::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(e) => Some(e),
            Self::Document(e) => Some(e),
            Self::Engine(e) => Some(e),
            Self::Store(e) => Some(e),
        }
    }
}

impl From<GraphError> for FlowError {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

impl From<DocumentError> for FlowError {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<EngineError> for FlowError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl From<StoreError> for FlowError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_display() {
        let err = GraphError::NodeNotFound {
            node_id: NodeId::from("7"),
        };
        assert!(err.to_string().contains("node not found"));
    }

    #[test]
    fn graph_error_branch_required() {
        let err = GraphError::BranchRequired {
            node_id: NodeId::from("3"),
        };
        assert!(err.to_string().contains("requires a branch"));
    }

    #[test]
    fn document_error_dangling_edge() {
        let err = DocumentError::DanglingEdge {
            edge_id: EdgeId::from("e2-3"),
            node_id: NodeId::from("3"),
        };
        assert!(err.to_string().contains("missing node"));
    }

    #[test]
    fn engine_error_display() {
        assert!(
            EngineError::NoTriggerNode
                .to_string()
                .contains("no trigger node")
        );
        let err = EngineError::StepLimitExceeded { limit: 64 };
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn flow_error_wraps_sources() {
        let err = FlowError::from(GraphError::NodeNotFound {
            node_id: NodeId::from("1"),
        });
        assert!(err.to_string().contains("graph error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
