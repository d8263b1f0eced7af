//! Versioned journey documents.
//!
//! A `FlowDocument` is the storage and transfer shape of a journey: a
//! flat node list plus edges with explicit endpoint ids. Import is
//! strict where the in-graph serde is lenient: a document that names
//! a missing node, repeats an id, or mislabels a branch is rejected
//! instead of silently pruned.

use crate::edge::{Branch, Edge, EdgeId};
use crate::error::{DocumentError, GraphError};
use crate::graph::FlowGraph;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};

/// The document schema version this build reads and writes.
pub const DOCUMENT_VERSION: u32 = 1;

/// An edge as stored in a document, endpoints flattened to ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Present only on edges leaving a condition node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
}

/// A journey serialized for storage or transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub version: u32,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<DocumentEdge>,
}

impl FlowDocument {
    /// Snapshots a graph into a document at the current version.
    #[must_use]
    pub fn from_graph(name: impl Into<String>, graph: &FlowGraph) -> Self {
        let nodes = graph.nodes().cloned().collect();
        let edges = graph
            .edges()
            .map(|(source, target, edge)| DocumentEdge {
                id: edge.id.clone(),
                source: source.clone(),
                target: target.clone(),
                branch: edge.branch,
            })
            .collect();

        Self {
            version: DOCUMENT_VERSION,
            name: name.into(),
            nodes,
            edges,
        }
    }

    /// Rebuilds the graph this document describes.
    ///
    /// Node and edge ids survive the roundtrip unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error when the document's version is unknown, a
    /// node id repeats, an edge names a missing node, an edge
    /// attaches where no handle exists, or an edge's branch does not
    /// fit its source kind.
    pub fn into_graph(self) -> Result<(String, FlowGraph), DocumentError> {
        if self.version != DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                version: self.version,
            });
        }

        let mut graph = FlowGraph::new();
        for node in self.nodes {
            let node_id = node.id.clone();
            graph
                .insert_node(node)
                .map_err(|_| DocumentError::DuplicateNodeId { node_id })?;
        }

        for DocumentEdge {
            id,
            source,
            target,
            branch,
        } in self.edges
        {
            graph
                .insert_edge(&source, &target, Edge::with_id(id.clone(), branch))
                .map_err(|err| match err {
                    GraphError::NodeNotFound { node_id } => DocumentError::DanglingEdge {
                        edge_id: id.clone(),
                        node_id,
                    },
                    GraphError::NoOutputHandle { node_id }
                    | GraphError::NoInputHandle { node_id } => DocumentError::IllegalEndpoint {
                        edge_id: id.clone(),
                        node_id,
                    },
                    GraphError::BranchRequired { node_id }
                    | GraphError::BranchNotAllowed { node_id }
                    | GraphError::DuplicateBranch { node_id, .. } => DocumentError::InvalidBranch {
                        edge_id: id.clone(),
                        node_id,
                    },
                    GraphError::DuplicateNodeId { node_id } => {
                        DocumentError::DuplicateNodeId { node_id }
                    }
                })?;
        }

        Ok((self.name, graph))
    }
}
