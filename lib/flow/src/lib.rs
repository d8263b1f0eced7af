//! Journey engine for the agencyzen platform.
//!
//! This crate provides the journey graph model and its runner:
//!
//! - **Graph Model**: Directed graphs using petgraph with typed nodes and edges
//! - **Node Kinds**: Trigger, Message, Condition, Agent, Delay, Tag, End
//! - **Documents**: Versioned import/export as flat node/edge lists
//! - **Execution**: Step-by-step runs behind an agent invoker seam
//! - **Storage**: Async store seam with an in-memory implementation

pub mod definition;
pub mod document;
pub mod edge;
pub mod engine;
pub mod error;
pub mod execution;
pub mod graph;
pub mod node;
pub mod sample;
pub mod store;

pub use definition::{Flow, FlowStatus, FlowSummary};
pub use document::{DOCUMENT_VERSION, DocumentEdge, FlowDocument};
pub use edge::{Branch, Connection, Edge, EdgeId};
pub use engine::{AgentInvoker, DEFAULT_STEP_LIMIT, FlowEngine};
pub use error::{DocumentError, EngineError, FlowError, GraphError, StoreError};
pub use execution::{FlowRun, RunState, StepRecord};
pub use graph::{DeletionOutcome, FlowGraph};
pub use node::{Node, NodeConfig, NodeId, NodeKind, Position, Predicate};
pub use sample::{SALES_JOURNEY_NAME, sales_flow, sales_journey};
pub use store::{FlowStore, InMemoryFlowStore};
