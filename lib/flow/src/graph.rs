//! Journey graph implementation using petgraph.
//!
//! Journeys are directed graphs where:
//! - Nodes are typed steps (trigger, message, condition, ...)
//! - Edges connect a node's output handle to the next step
//!
//! Editing stays permissive the way the canvas is: multiple triggers,
//! self-loops, and cycles are all legal. Validation rejects only
//! connections that are structurally meaningless (into a trigger, out
//! of an end, branchless out of a condition). The runner bounds steps
//! instead of forbidding cycles here.

use crate::edge::{Branch, Connection, Edge, EdgeId};
use crate::error::GraphError;
use crate::node::{Node, NodeId, NodeKind, Position};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A journey graph using petgraph's directed graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowGraph {
    /// The underlying directed graph.
    #[serde(with = "graph_serde")]
    graph: DiGraph<Node, Edge>,
    /// Map from NodeId to petgraph's NodeIndex for O(1) lookup.
    #[serde(skip)]
    node_index_map: HashMap<NodeId, NodeIndex>,
}

/// What a delete-selection pass removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeletionOutcome {
    /// IDs of the nodes that were removed.
    pub removed_nodes: Vec<NodeId>,
    /// IDs of the edges that were removed along with them.
    pub removed_edges: Vec<EdgeId>,
}

impl DeletionOutcome {
    /// Returns true when the pass removed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed_nodes.is_empty() && self.removed_edges.is_empty()
    }
}

impl FlowGraph {
    /// Creates a new empty journey graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index_map: HashMap::new(),
        }
    }

    /// Drops a new node onto the canvas.
    ///
    /// The node gets a fresh unique id and the kind's default label
    /// and configuration. Any kind is always a legal addition,
    /// including additional triggers and ends.
    pub fn spawn_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let node = Node::new(kind, position);
        let node_id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_index_map.insert(node_id.clone(), index);
        tracing::debug!(node_id = %node_id, kind = %kind, "node spawned");
        node_id
    }

    /// Inserts a node with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNodeId` if a node with the same id already
    /// exists in the graph.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        if self.node_index_map.contains_key(&node.id) {
            return Err(GraphError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
        let node_id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_index_map.insert(node_id.clone(), index);
        Ok(node_id)
    }

    /// Returns a reference to a node by its ID.
    #[must_use]
    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        let index = self.node_index_map.get(node_id)?;
        self.graph.node_weight(*index)
    }

    /// Returns a mutable reference to a node by its ID.
    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        let index = self.node_index_map.get(node_id)?;
        self.graph.node_weight_mut(*index)
    }

    /// Returns true when the graph contains a node with this ID.
    #[must_use]
    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node_index_map.contains_key(node_id)
    }

    /// Connects two nodes, as drawn on the canvas.
    ///
    /// A second connection on the same branch of a condition node
    /// replaces the previous one. Self-loops and cycles are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Source or target node doesn't exist
    /// - The source is an end node (no output handles)
    /// - The target is a trigger node (no incoming edges)
    /// - The source is a condition node and no branch was given
    /// - The source is not a condition node and a branch was given
    pub fn connect(&mut self, connection: Connection) -> Result<EdgeId, GraphError> {
        let (source_index, target_index) =
            self.check_connection(&connection.source, &connection.target, connection.branch)?;

        let edge = match connection.branch {
            Some(branch) => {
                self.displace_branch_edge(source_index, branch);
                Edge::on_branch(branch)
            }
            None => Edge::new(),
        };

        let edge_id = edge.id.clone();
        self.graph.add_edge(source_index, target_index, edge);
        tracing::debug!(
            source = %connection.source,
            target = %connection.target,
            edge_id = %edge_id,
            "nodes connected"
        );
        Ok(edge_id)
    }

    /// Inserts an edge with a caller-chosen id between two nodes.
    ///
    /// Document import and canned journeys use this to keep stable
    /// edge ids. Validation matches [`FlowGraph::connect`], except an
    /// occupied condition branch is an error here, not a replacement.
    ///
    /// # Errors
    ///
    /// Returns the same errors as `connect`, plus `DuplicateBranch`
    /// when the edge's branch already carries an edge.
    pub fn insert_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        edge: Edge,
    ) -> Result<EdgeId, GraphError> {
        let (source_index, target_index) = self.check_connection(source, target, edge.branch)?;

        if let Some(branch) = edge.branch {
            let taken = self
                .graph
                .edges_directed(source_index, Direction::Outgoing)
                .any(|e| e.weight().branch == Some(branch));
            if taken {
                return Err(GraphError::DuplicateBranch {
                    node_id: source.clone(),
                    branch,
                });
            }
        }

        let edge_id = edge.id.clone();
        self.graph.add_edge(source_index, target_index, edge);
        Ok(edge_id)
    }

    /// Validates a prospective connection and resolves its endpoints.
    fn check_connection(
        &self,
        source: &NodeId,
        target: &NodeId,
        branch: Option<Branch>,
    ) -> Result<(NodeIndex, NodeIndex), GraphError> {
        let source_index =
            *self
                .node_index_map
                .get(source)
                .ok_or_else(|| GraphError::NodeNotFound {
                    node_id: source.clone(),
                })?;
        let target_index =
            *self
                .node_index_map
                .get(target)
                .ok_or_else(|| GraphError::NodeNotFound {
                    node_id: target.clone(),
                })?;

        let source_kind = self.graph[source_index].kind();
        if source_kind.output_handles().is_empty() {
            return Err(GraphError::NoOutputHandle {
                node_id: source.clone(),
            });
        }
        if !self.graph[target_index].accepts_input() {
            return Err(GraphError::NoInputHandle {
                node_id: target.clone(),
            });
        }
        match (source_kind, branch) {
            (NodeKind::Condition, None) => Err(GraphError::BranchRequired {
                node_id: source.clone(),
            }),
            (kind, Some(_)) if kind != NodeKind::Condition => Err(GraphError::BranchNotAllowed {
                node_id: source.clone(),
            }),
            _ => Ok((source_index, target_index)),
        }
    }

    /// Removes an existing edge on the given branch of a condition
    /// node, if one exists.
    fn displace_branch_edge(&mut self, source_index: NodeIndex, branch: Branch) {
        let existing = self
            .graph
            .edges_directed(source_index, Direction::Outgoing)
            .find(|e| e.weight().branch == Some(branch))
            .map(|e| (e.id(), e.weight().id.clone()));

        if let Some((edge_index, edge_id)) = existing {
            self.graph.remove_edge(edge_index);
            tracing::debug!(edge_id = %edge_id, branch = %branch, "branch edge replaced");
        }
    }

    /// Moves a node to a new canvas position.
    ///
    /// Purely cosmetic; edges keep their logical endpoints.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node is not in the graph.
    pub fn move_node(&mut self, node_id: &NodeId, position: Position) -> Result<(), GraphError> {
        let node = self.node_mut(node_id).ok_or_else(|| GraphError::NodeNotFound {
            node_id: node_id.clone(),
        })?;
        node.position = position;
        Ok(())
    }

    /// Deletes the selected nodes and prunes dependent edges.
    ///
    /// Two-phase removal: first every edge touching the selection is
    /// identified, then selected nodes are removed (taking those edges
    /// with them). An edge survives if and only if both its endpoints
    /// survive. Unknown ids in the selection are ignored.
    pub fn delete_selection<I>(&mut self, selected: I) -> DeletionOutcome
    where
        I: IntoIterator<Item = NodeId>,
    {
        let selected: HashSet<NodeId> = selected
            .into_iter()
            .filter(|id| self.node_index_map.contains_key(id))
            .collect();
        if selected.is_empty() {
            return DeletionOutcome::default();
        }

        let mut removed_edges: Vec<EdgeId> = self
            .graph
            .edge_references()
            .filter(|e| {
                let source = &self.graph[e.source()].id;
                let target = &self.graph[e.target()].id;
                selected.contains(source) || selected.contains(target)
            })
            .map(|e| e.weight().id.clone())
            .collect();
        removed_edges.sort();

        let mut removed_nodes = Vec::with_capacity(selected.len());
        for node_id in &selected {
            // remove_node swap-invalidates indices, so resolve each id
            // against the current graph rather than the cached map.
            let index = self
                .graph
                .node_indices()
                .find(|&idx| self.graph[idx].id == *node_id);
            if let Some(index) = index {
                self.graph.remove_node(index);
                removed_nodes.push(node_id.clone());
            }
        }
        removed_nodes.sort();
        self.rebuild_index_map();

        tracing::debug!(
            nodes = removed_nodes.len(),
            edges = removed_edges.len(),
            "selection deleted"
        );
        DeletionOutcome {
            removed_nodes,
            removed_edges,
        }
    }

    /// Returns all nodes in the graph.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Returns all edges as (source id, target id, edge) triples.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId, &Edge)> {
        self.graph.edge_references().map(|e| {
            (
                &self.graph[e.source()].id,
                &self.graph[e.target()].id,
                e.weight(),
            )
        })
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the outgoing connections of a node, oldest edge first.
    ///
    /// petgraph iterates adjacency newest-first; the runner wants the
    /// order edges were drawn in, so sort by edge index.
    pub fn outgoing(&self, node_id: &NodeId) -> Vec<(&Node, &Edge)> {
        let Some(&index) = self.node_index_map.get(node_id) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .filter_map(|edge| {
                let target = self.graph.node_weight(edge.target())?;
                Some((target, edge.weight()))
            })
            .collect()
    }

    /// Returns the first node of the given kind, in insertion order.
    #[must_use]
    pub fn first_node_of_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .find(|node| node.kind() == kind)
    }

    /// Validates structural invariants of the graph.
    ///
    /// `connect` enforces these on the editing path; this re-checks
    /// them for graphs that arrived through deserialization:
    /// - No edge out of an end node or into a trigger node
    /// - Edges out of condition nodes carry a branch, others don't
    /// - At most one edge per branch of each condition node
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violation found.
    pub fn validate(&self) -> Result<(), GraphError> {
        for edge in self.graph.edge_references() {
            let source = &self.graph[edge.source()];
            let target = &self.graph[edge.target()];

            if source.output_handles().is_empty() {
                return Err(GraphError::NoOutputHandle {
                    node_id: source.id.clone(),
                });
            }
            if !target.accepts_input() {
                return Err(GraphError::NoInputHandle {
                    node_id: target.id.clone(),
                });
            }
            match (source.kind(), edge.weight().branch) {
                (NodeKind::Condition, None) => {
                    return Err(GraphError::BranchRequired {
                        node_id: source.id.clone(),
                    });
                }
                (NodeKind::Condition, Some(_)) => {}
                (_, Some(_)) => {
                    return Err(GraphError::BranchNotAllowed {
                        node_id: source.id.clone(),
                    });
                }
                (_, None) => {}
            }
        }

        for index in self.graph.node_indices() {
            let node = &self.graph[index];
            if node.kind() != NodeKind::Condition {
                continue;
            }
            for branch in [Branch::True, Branch::False] {
                let count = self
                    .graph
                    .edges_directed(index, Direction::Outgoing)
                    .filter(|e| e.weight().branch == Some(branch))
                    .count();
                if count > 1 {
                    return Err(GraphError::DuplicateBranch {
                        node_id: node.id.clone(),
                        branch,
                    });
                }
            }
        }

        Ok(())
    }

    /// Rebuilds the node index map after deserialization.
    pub fn rebuild_index_map(&mut self) {
        self.node_index_map.clear();
        for index in self.graph.node_indices() {
            if let Some(node) = self.graph.node_weight(index) {
                self.node_index_map.insert(node.id.clone(), index);
            }
        }
    }
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Custom serde for petgraph DiGraph.
mod graph_serde {
    use super::*;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeStruct;

    pub fn serialize<S>(graph: &DiGraph<Node, Edge>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let nodes: Vec<_> = graph.node_weights().cloned().collect();
        let edges: Vec<_> = graph
            .edge_references()
            .map(|e| {
                let source_id = graph.node_weight(e.source()).map(|n| n.id.clone());
                let target_id = graph.node_weight(e.target()).map(|n| n.id.clone());
                (source_id, target_id, e.weight().clone())
            })
            .collect();

        let mut state = serializer.serialize_struct("Graph", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DiGraph<Node, Edge>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        type EdgeTuple = (Option<NodeId>, Option<NodeId>, Edge);

        struct GraphVisitor;

        impl<'de> Visitor<'de> for GraphVisitor {
            type Value = DiGraph<Node, Edge>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a journey graph with nodes and edges")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut nodes: Option<Vec<Node>> = None;
                let mut edges: Option<Vec<EdgeTuple>> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "nodes" => nodes = Some(map.next_value()?),
                        "edges" => edges = Some(map.next_value()?),
                        _ => {
                            let _ = map.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }

                let nodes = nodes.unwrap_or_default();
                let edges = edges.unwrap_or_default();

                let mut graph = DiGraph::new();
                let mut id_to_index = HashMap::new();

                for node in nodes {
                    let id = node.id.clone();
                    let index = graph.add_node(node);
                    id_to_index.insert(id, index);
                }

                for (source_id, target_id, edge) in edges {
                    let (Some(source), Some(target)) = (source_id, target_id) else {
                        continue;
                    };
                    let (Some(&source_idx), Some(&target_idx)) =
                        (id_to_index.get(&source), id_to_index.get(&target))
                    else {
                        continue;
                    };
                    graph.add_edge(source_idx, target_idx, edge);
                }

                Ok(graph)
            }
        }

        deserializer.deserialize_struct("Graph", &["nodes", "edges"], GraphVisitor)
    }
}
