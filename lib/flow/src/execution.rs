//! Journey run records.
//!
//! A [`FlowRun`] captures one pass of the engine over a journey: the
//! input that triggered it, every step taken in order, and the final
//! outcome. Runs start executing immediately; there is no queue.

use crate::node::{NodeId, NodeKind};
use agencyzen_core::RunId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The overall state of a journey run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Run is actively executing.
    Running,
    /// Run completed successfully.
    Completed,
    /// Run failed.
    Failed,
}

impl RunState {
    /// Returns true if this is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A record of a single executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// The node that was executed.
    pub node_id: NodeId,
    /// The node's kind at execution time.
    pub kind: NodeKind,
    /// The output the node produced.
    pub output: JsonValue,
    /// The output handle the run left through, if any.
    pub handle: Option<String>,
    /// When the step ran.
    pub at: DateTime<Utc>,
}

impl StepRecord {
    /// Creates a step record stamped with the current time.
    #[must_use]
    pub fn new(
        node_id: NodeId,
        kind: NodeKind,
        output: JsonValue,
        handle: Option<String>,
    ) -> Self {
        Self {
            node_id,
            kind,
            output,
            handle,
            at: Utc::now(),
        }
    }
}

/// A record of a single journey run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRun {
    /// Unique identifier for this run.
    pub id: RunId,
    /// Name of the journey that ran.
    pub flow_name: String,
    /// Current state.
    pub state: RunState,
    /// Input data that triggered the run.
    pub input: JsonValue,
    /// Final output of the run (if completed).
    pub output: Option<JsonValue>,
    /// Steps taken, in execution order.
    pub steps: Vec<StepRecord>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl FlowRun {
    /// Starts a new run over the named journey.
    #[must_use]
    pub fn start(flow_name: impl Into<String>, input: JsonValue) -> Self {
        Self {
            id: RunId::new(),
            flow_name: flow_name.into(),
            state: RunState::Running,
            input,
            output: None,
            steps: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            error: None,
        }
    }

    /// Appends an executed step.
    pub fn record_step(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    /// Marks the run as completed.
    pub fn complete(&mut self, output: JsonValue) {
        self.state = RunState::Completed;
        self.finished_at = Some(Utc::now());
        self.output = Some(output);
    }

    /// Marks the run as failed.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = RunState::Failed;
        self.finished_at = Some(Utc::now());
        self.error = Some(error.into());
    }

    /// Returns the duration of the run so far, or total if finished.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        end - self.started_at
    }

    /// Returns the ids of the nodes visited, in order.
    #[must_use]
    pub fn visited_nodes(&self) -> Vec<&NodeId> {
        self.steps.iter().map(|step| &step.node_id).collect()
    }
}
