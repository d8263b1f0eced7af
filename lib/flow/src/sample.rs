//! The canned sales journey that seeds new workspaces.
//!
//! Six nodes: inbound-message trigger, greeting, a price question
//! check, then either the WhatsApp persona or a qualification tag,
//! both converging on the end node.

use crate::definition::Flow;
use crate::edge::{Branch, Edge};
use crate::graph::FlowGraph;
use crate::node::{Node, NodeConfig, NodeId, Position, Predicate};

/// Name the canned journey is registered under.
pub const SALES_JOURNEY_NAME: &str = "fluxo_vendas";

/// Builds the canned sales journey graph.
#[must_use]
pub fn sales_journey() -> (String, FlowGraph) {
    let mut graph = FlowGraph::new();

    let nodes = [
        Node::with_id(
            "1",
            "Evento",
            Position::new(50.0, 200.0),
            NodeConfig::Trigger {
                event: "Mensagem recebida".to_string(),
            },
        ),
        Node::with_id(
            "2",
            "Enviar Mensagem",
            Position::new(300.0, 200.0),
            NodeConfig::Message {
                text: "Olá! Como posso ajudar?".to_string(),
            },
        ),
        Node::with_id(
            "3",
            "Condicional",
            Position::new(550.0, 150.0),
            NodeConfig::Condition {
                predicate: Predicate::Contains {
                    value: "preço".to_string(),
                },
            },
        )
        .with_description("Contém 'preço'?"),
        Node::with_id(
            "4",
            "Chamar Agente",
            Position::new(800.0, 100.0),
            NodeConfig::Agent {
                agent: "Zap Zen".to_string(),
            },
        ),
        Node::with_id(
            "5",
            "Adicionar Etiqueta",
            Position::new(800.0, 250.0),
            NodeConfig::Tag {
                tag: "Lead Qualificado".to_string(),
            },
        ),
        Node::with_id("6", "Fim da Jornada", Position::new(1050.0, 175.0), NodeConfig::End),
    ];
    for node in nodes {
        graph
            .insert_node(node)
            .expect("sample journey node ids are unique");
    }

    let edges = [
        ("e1-2", "1", "2", None),
        ("e2-3", "2", "3", None),
        ("e3-4", "3", "4", Some(Branch::True)),
        ("e3-5", "3", "5", Some(Branch::False)),
        ("e4-6", "4", "6", None),
        ("e5-6", "5", "6", None),
    ];
    for (id, source, target, branch) in edges {
        graph
            .insert_edge(
                &NodeId::from(source),
                &NodeId::from(target),
                Edge::with_id(id, branch),
            )
            .expect("sample journey edges are well formed");
    }

    (SALES_JOURNEY_NAME.to_string(), graph)
}

/// Builds the canned sales journey as a ready-to-store [`Flow`].
#[must_use]
pub fn sales_flow() -> Flow {
    let (name, graph) = sales_journey();
    Flow::new(name).with_graph(graph)
}
