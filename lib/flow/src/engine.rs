//! Journey execution engine.
//!
//! Walks a journey graph from its trigger node, one step at a time.
//! Each node kind has a handler that produces an output value and
//! names the handle the run leaves through; the next node is the
//! target of the first outgoing edge whose branch matches that handle
//! (unconditional edges match any handle). The walk ends at an end
//! node, at a node with no matching edge, or at the step limit.
//!
//! Agent nodes call out through the [`AgentInvoker`] seam so the
//! engine never depends on a concrete persona backend.

use crate::definition::Flow;
use crate::edge::Branch;
use crate::error::EngineError;
use crate::execution::{FlowRun, StepRecord};
use crate::node::{Node, NodeConfig, NodeKind};
use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on steps per run. Journeys may contain cycles, so
/// every run is cut off after this many steps.
pub const DEFAULT_STEP_LIMIT: usize = 64;

/// Seam through which agent nodes reach a persona backend.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    /// Asks the named persona to answer a message.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAgent` when no persona answers to that name;
    /// other errors abort the run.
    async fn invoke(&self, agent: &str, message: &str) -> Result<String, EngineError>;
}

/// What executing one node produced.
struct StepOutcome {
    output: JsonValue,
    /// Handle the run leaves through; `None` ends the run.
    handle: Option<String>,
}

/// Mutable state threaded through a run.
struct Context {
    /// Output of the previous step, input to the next.
    input: JsonValue,
    /// Named variables substituted into message text.
    variables: HashMap<String, String>,
}

/// Executes journeys against an [`AgentInvoker`].
pub struct FlowEngine {
    invoker: Arc<dyn AgentInvoker>,
    step_limit: usize,
}

impl FlowEngine {
    /// Creates an engine with the default step limit.
    #[must_use]
    pub fn new(invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            invoker,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Overrides the per-run step limit.
    #[must_use]
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Runs a journey to completion.
    ///
    /// # Errors
    ///
    /// Returns `NoTriggerNode` when the graph has no entry point,
    /// `StepLimitExceeded` when a cyclic journey runs too long, and
    /// any hard failure from a node handler.
    pub async fn run(&self, flow: &Flow, input: JsonValue) -> Result<FlowRun, EngineError> {
        let trigger = flow
            .graph
            .first_node_of_kind(NodeKind::Trigger)
            .ok_or(EngineError::NoTriggerNode)?;

        let mut run = FlowRun::start(&flow.name, input.clone());
        tracing::info!(flow = %flow.name, run_id = %run.id, "journey run started");

        let mut context = Context {
            input,
            variables: HashMap::new(),
        };
        let mut current = trigger;

        loop {
            if run.steps.len() >= self.step_limit {
                return Err(EngineError::StepLimitExceeded {
                    limit: self.step_limit,
                });
            }

            let StepOutcome { output, handle } = self.execute_node(current, &context).await?;
            tracing::debug!(
                node_id = %current.id,
                kind = %current.kind(),
                handle = handle.as_deref().unwrap_or("-"),
                "step executed"
            );
            run.record_step(StepRecord::new(
                current.id.clone(),
                current.kind(),
                output.clone(),
                handle.clone(),
            ));
            context.input = output;

            // An end node yields no handle.
            let Some(handle) = handle else { break };
            let next = flow
                .graph
                .outgoing(&current.id)
                .into_iter()
                .find(|(_, edge)| match edge.branch {
                    Some(branch) => branch.handle() == handle,
                    None => true,
                });
            match next {
                Some((node, _)) => current = node,
                None => break,
            }
        }

        run.complete(context.input);
        tracing::info!(
            flow = %flow.name,
            run_id = %run.id,
            steps = run.steps.len(),
            "journey run finished"
        );
        Ok(run)
    }

    async fn execute_node(
        &self,
        node: &Node,
        context: &Context,
    ) -> Result<StepOutcome, EngineError> {
        let outcome = match &node.config {
            NodeConfig::Trigger { .. } => StepOutcome {
                output: context.input.clone(),
                handle: Some("next".to_string()),
            },
            NodeConfig::Message { text } => StepOutcome {
                output: json!({ "message": interpolate(text, &context.variables) }),
                handle: Some("next".to_string()),
            },
            NodeConfig::Condition { predicate } => {
                let branch = if predicate.evaluate(&stringify(&context.input)) {
                    Branch::True
                } else {
                    Branch::False
                };
                StepOutcome {
                    output: context.input.clone(),
                    handle: Some(branch.handle().to_string()),
                }
            }
            NodeConfig::Agent { agent } => {
                let message = stringify(&context.input);
                let output = match self.invoker.invoke(agent, &message).await {
                    Ok(response) => json!({ "response": response }),
                    Err(EngineError::UnknownAgent { agent }) => {
                        tracing::warn!(agent = %agent, node_id = %node.id, "agent lookup failed");
                        json!({ "error": "Agent not found" })
                    }
                    Err(err) => return Err(err),
                };
                StepOutcome {
                    output,
                    handle: Some("response".to_string()),
                }
            }
            NodeConfig::Delay { seconds } => {
                tokio::time::sleep(Duration::from_secs(*seconds)).await;
                StepOutcome {
                    output: context.input.clone(),
                    handle: Some("next".to_string()),
                }
            }
            NodeConfig::Tag { tag } => StepOutcome {
                output: attach_tag(context.input.clone(), tag),
                handle: Some("next".to_string()),
            },
            NodeConfig::End => StepOutcome {
                output: context.input.clone(),
                handle: None,
            },
        };
        Ok(outcome)
    }
}

/// Substitutes `{key}` placeholders from the variables map.
fn interpolate(text: &str, variables: &HashMap<String, String>) -> String {
    let mut message = text.to_string();
    for (key, value) in variables {
        message = message.replace(&format!("{{{key}}}"), value);
    }
    message
}

/// Flattens a step value to the string form predicates see.
fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Merges a tag into an object value; anything else gets wrapped.
fn attach_tag(input: JsonValue, tag: &str) -> JsonValue {
    match input {
        JsonValue::Object(mut map) => {
            map.insert("tag".to_string(), JsonValue::String(tag.to_string()));
            JsonValue::Object(map)
        }
        other => json!({ "value": other, "tag": tag }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Connection;
    use crate::execution::RunState;
    use crate::graph::FlowGraph;
    use crate::node::{NodeId, Position, Predicate};
    use crate::sample;
    use tokio::sync::Mutex;

    /// Records every invocation and answers with a fixed shape.
    struct RecordingInvoker {
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl RecordingInvoker {
        fn new() -> (Arc<Self>, Arc<Mutex<Vec<(String, String)>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            let invoker = Arc::new(Self {
                calls: calls.clone(),
            });
            (invoker, calls)
        }
    }

    #[async_trait]
    impl AgentInvoker for RecordingInvoker {
        async fn invoke(&self, agent: &str, message: &str) -> Result<String, EngineError> {
            self.calls
                .lock()
                .await
                .push((agent.to_string(), message.to_string()));
            Ok(format!("[{agent}] recebido"))
        }
    }

    /// Knows no personas at all.
    struct NoPersonas;

    #[async_trait]
    impl AgentInvoker for NoPersonas {
        async fn invoke(&self, agent: &str, _message: &str) -> Result<String, EngineError> {
            Err(EngineError::UnknownAgent {
                agent: agent.to_string(),
            })
        }
    }

    fn branching_flow() -> Flow {
        let mut graph = FlowGraph::new();
        let trigger = graph.spawn_node(NodeKind::Trigger, Position::default());
        let condition = graph.spawn_node(NodeKind::Condition, Position::default());
        let agent = graph.spawn_node(NodeKind::Agent, Position::default());
        let tag = graph.spawn_node(NodeKind::Tag, Position::default());

        if let Some(node) = graph.node_mut(&condition) {
            node.config = NodeConfig::Condition {
                predicate: Predicate::Contains {
                    value: "preço".to_string(),
                },
            };
        }
        if let Some(node) = graph.node_mut(&agent) {
            node.config = NodeConfig::Agent {
                agent: "whatsapp".to_string(),
            };
        }
        if let Some(node) = graph.node_mut(&tag) {
            node.config = NodeConfig::Tag {
                tag: "Sem preço".to_string(),
            };
        }

        graph
            .connect(Connection::new(trigger, condition.clone()))
            .unwrap();
        graph
            .connect(Connection::on_branch(
                condition.clone(),
                agent,
                Branch::True,
            ))
            .unwrap();
        graph
            .connect(Connection::on_branch(condition, tag, Branch::False))
            .unwrap();

        Flow::new("roteamento").with_graph(graph)
    }

    #[tokio::test]
    async fn canned_journey_takes_the_false_branch() {
        // The greeting message replaces the input before the condition
        // sees it, so the price check never matches.
        let (invoker, calls) = RecordingInvoker::new();
        let engine = FlowEngine::new(invoker);
        let flow = sample::sales_flow();

        let run = engine
            .run(&flow, json!("qual o preço do plano?"))
            .await
            .expect("run");

        assert_eq!(run.state, RunState::Completed);
        let visited: Vec<_> = run.visited_nodes().iter().map(|id| id.as_str()).collect();
        assert_eq!(visited, vec!["1", "2", "3", "5", "6"]);
        assert_eq!(
            run.output,
            Some(json!({
                "message": "Olá! Como posso ajudar?",
                "tag": "Lead Qualificado"
            }))
        );
        assert!(calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn condition_routes_on_input() {
        let (invoker, calls) = RecordingInvoker::new();
        let engine = FlowEngine::new(invoker);
        let flow = branching_flow();

        let run = engine
            .run(&flow, json!("qual o preço do plano?"))
            .await
            .expect("run");

        assert_eq!(run.state, RunState::Completed);
        assert_eq!(run.steps.len(), 3);
        assert_eq!(run.steps[1].handle.as_deref(), Some("true"));
        assert_eq!(
            run.output,
            Some(json!({ "response": "[whatsapp] recebido" }))
        );

        let calls = calls.lock().await;
        assert_eq!(
            calls.as_slice(),
            &[(
                "whatsapp".to_string(),
                "qual o preço do plano?".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn condition_false_branch_tags_the_input() {
        let (invoker, calls) = RecordingInvoker::new();
        let engine = FlowEngine::new(invoker);
        let flow = branching_flow();

        let run = engine.run(&flow, json!("bom dia")).await.expect("run");

        assert_eq!(run.steps[1].handle.as_deref(), Some("false"));
        assert_eq!(
            run.output,
            Some(json!({ "value": "bom dia", "tag": "Sem preço" }))
        );
        assert!(calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_agent_becomes_error_output() {
        let engine = FlowEngine::new(Arc::new(NoPersonas));
        let flow = branching_flow();

        let run = engine.run(&flow, json!("preço?")).await.expect("run");

        assert_eq!(run.state, RunState::Completed);
        let agent_step = &run.steps[2];
        assert_eq!(agent_step.kind, NodeKind::Agent);
        assert_eq!(agent_step.output, json!({ "error": "Agent not found" }));
    }

    #[tokio::test]
    async fn missing_trigger_is_an_error() {
        let (invoker, _) = RecordingInvoker::new();
        let engine = FlowEngine::new(invoker);
        let flow = Flow::new("vazio");

        let result = engine.run(&flow, JsonValue::Null).await;
        assert_eq!(result.unwrap_err(), EngineError::NoTriggerNode);
    }

    #[tokio::test]
    async fn cyclic_journey_hits_the_step_limit() {
        let (invoker, _) = RecordingInvoker::new();
        let engine = FlowEngine::new(invoker).with_step_limit(8);

        let mut graph = FlowGraph::new();
        let trigger = graph.spawn_node(NodeKind::Trigger, Position::default());
        let message = graph.spawn_node(NodeKind::Message, Position::default());
        graph
            .connect(Connection::new(trigger, message.clone()))
            .unwrap();
        graph
            .connect(Connection::new(message.clone(), message))
            .unwrap();
        let flow = Flow::new("laço").with_graph(graph);

        let result = engine.run(&flow, json!("oi")).await;
        assert_eq!(
            result.unwrap_err(),
            EngineError::StepLimitExceeded { limit: 8 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delay_waits_its_configured_seconds() {
        let (invoker, _) = RecordingInvoker::new();
        let engine = FlowEngine::new(invoker);

        let mut graph = FlowGraph::new();
        let trigger = graph.spawn_node(NodeKind::Trigger, Position::default());
        let delay = graph.spawn_node(NodeKind::Delay, Position::default());
        let end = graph.spawn_node(NodeKind::End, Position::default());
        if let Some(node) = graph.node_mut(&delay) {
            node.config = NodeConfig::Delay { seconds: 3 };
        }
        graph.connect(Connection::new(trigger, delay.clone())).unwrap();
        graph.connect(Connection::new(delay, end)).unwrap();
        let flow = Flow::new("espera").with_graph(graph);

        let before = tokio::time::Instant::now();
        let run = engine.run(&flow, json!("oi")).await.expect("run");
        let waited = tokio::time::Instant::now() - before;

        assert_eq!(run.state, RunState::Completed);
        assert!(waited >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn run_stops_where_no_edge_continues() {
        let (invoker, _) = RecordingInvoker::new();
        let engine = FlowEngine::new(invoker);

        let mut graph = FlowGraph::new();
        let trigger = graph.spawn_node(NodeKind::Trigger, Position::default());
        let message = graph.spawn_node(NodeKind::Message, Position::default());
        graph.connect(Connection::new(trigger, message)).unwrap();
        let flow = Flow::new("solto").with_graph(graph);

        let run = engine.run(&flow, json!("oi")).await.expect("run");
        assert_eq!(run.state, RunState::Completed);
        assert_eq!(run.steps.len(), 2);
    }

    #[test]
    fn interpolate_replaces_known_variables() {
        let mut variables = HashMap::new();
        variables.insert("nome".to_string(), "Ana".to_string());

        let message = interpolate("Olá {nome}! {plano} disponível.", &variables);
        assert_eq!(message, "Olá Ana! {plano} disponível.");
    }

    #[test]
    fn stringify_keeps_strings_bare() {
        assert_eq!(stringify(&json!("preço")), "preço");
        assert_eq!(stringify(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(stringify(&JsonValue::Null), "null");
    }

    #[test]
    fn attach_tag_merges_or_wraps() {
        let merged = attach_tag(json!({"message": "oi"}), "Lead");
        assert_eq!(merged, json!({"message": "oi", "tag": "Lead"}));

        let wrapped = attach_tag(json!(42), "Lead");
        assert_eq!(wrapped, json!({"value": 42, "tag": "Lead"}));
    }

    #[test]
    fn nodes_without_id_collisions_in_branching_fixture() {
        let flow = branching_flow();
        assert!(flow.validate().is_ok());
        let ids: std::collections::HashSet<_> =
            flow.graph.nodes().map(|n| n.id.clone()).collect();
        assert_eq!(ids.len(), flow.graph.node_count());
        assert!(!ids.contains(&NodeId::from("")));
    }
}
