mod config;
mod invoker;

use std::sync::Arc;
use std::time::Duration;

use agencyzen_agent::default_roster;
use agencyzen_client::sample_clients;
use agencyzen_conversation::{Contact, Conversation, PendingReply, sample_inbox};
use agencyzen_flow::{
    Branch, Connection, EngineError, Flow, FlowEngine, FlowGraph, FlowRun, FlowSummary,
    NodeConfig, NodeId, NodeKind, Position, Predicate, sales_flow,
};
use agencyzen_integration::{
    AVAILABLE_MODELS, ImageGenerator, ImageRequest, IntegrationError, SessionData,
    SimulatedBackend, WhatsAppConnection,
};
use agencyzen_settings::{Settings, SettingsStore};
use rootcause::prelude::Report;
use serde_json::json;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ConsoleConfig;
use crate::invoker::{RosterInvoker, SharedRoster};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ConsoleConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let settings = load_settings(&config);
    tracing::info!(
        chat_model = settings.model.display_name(),
        image_model = settings.image_model.display_name(),
        openai_key = %settings.masked_openai_key(),
        "Active settings"
    );

    // Seed the workspace with the stock team, clients and inbox
    let roster: SharedRoster = Arc::new(Mutex::new(default_roster()));
    let clients = sample_clients();
    let inbox = sample_inbox();
    let persona_count = roster.lock().await.len();
    tracing::info!(
        personas = persona_count,
        clients = clients.len(),
        conversations = inbox.len(),
        unread = inbox.total_unread(),
        "Workspace seeded"
    );

    // The canned sales journey, exactly as the editor seeds it
    let flow = sales_flow();
    flow.validate().expect("sales journey is well formed");
    let summary = FlowSummary::from(&flow);
    tracing::info!(
        flow = %summary.name,
        status = summary.status.label(),
        nodes = summary.node_count,
        edges = summary.edge_count,
        "Journey ready"
    );

    let engine = FlowEngine::new(Arc::new(RosterInvoker::new(Arc::clone(&roster), None)))
        .with_step_limit(config.engine_step_limit);

    // The greeting replaces the input before the condition sees it, so
    // this run lands on the tag branch even for a price question.
    if let Err(e) = drive_journey(&engine, &flow, "qual o preço do plano?").await {
        tracing::error!(error = %e, "Sales journey run failed");
    }

    // A triage journey checks the raw inbound message, so the same
    // question reaches the WhatsApp persona.
    let triage = triage_journey();
    triage.validate().expect("triage journey is well formed");
    if let Err(e) = drive_journey(&engine, &triage, "qual o preço do plano?").await {
        tracing::error!(error = %e, "Triage journey run failed");
    }

    deletion_scenario();

    conversation_demo(&config, Arc::clone(&roster)).await;

    if let Err(e) = whatsapp_demo() {
        tracing::error!(error = %e, "WhatsApp demo failed");
    }

    image_catalog();
    image_generation_demo(&settings).await;
}

/// Loads persisted settings, falling back to defaults when the file is
/// unreadable. A missing file already loads as defaults.
fn load_settings(config: &ConsoleConfig) -> Settings {
    match SettingsStore::new(&config.settings_path).load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load settings, using defaults");
            Settings::default()
        }
    }
}

/// Runs one journey and logs the path the run took.
async fn drive_journey(
    engine: &FlowEngine,
    flow: &Flow,
    input: &str,
) -> Result<FlowRun, Report<EngineError>> {
    let run = engine.run(flow, json!(input)).await?;

    let path: Vec<&str> = run.visited_nodes().iter().map(|id| id.as_str()).collect();
    tracing::info!(
        flow = %run.flow_name,
        path = %path.join(" -> "),
        steps = run.steps.len(),
        "Journey run completed"
    );
    if let Some(output) = &run.output {
        tracing::info!(output = %output, "Journey output");
    }
    Ok(run)
}

/// Builds a journey with the condition straight after the trigger:
/// price questions go to the WhatsApp persona, everything else gets a
/// qualification tag.
fn triage_journey() -> Flow {
    let mut graph = FlowGraph::new();
    let trigger = graph.spawn_node(NodeKind::Trigger, Position::new(50.0, 150.0));
    let condition = graph.spawn_node(NodeKind::Condition, Position::new(300.0, 150.0));
    let agent = graph.spawn_node(NodeKind::Agent, Position::new(550.0, 100.0));
    let tag = graph.spawn_node(NodeKind::Tag, Position::new(550.0, 200.0));

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
            tag: "Sem interesse em preço".to_string(),
        };
    }

    graph
        .connect(Connection::new(trigger, condition.clone()))
        .expect("triage journey edges are well formed");
    graph
        .connect(Connection::on_branch(condition.clone(), agent, Branch::True))
        .expect("triage journey edges are well formed");
    graph
        .connect(Connection::on_branch(condition, tag, Branch::False))
        .expect("triage journey edges are well formed");

    Flow::new("triagem_whatsapp").with_graph(graph)
}

/// Shows how deleting the condition node prunes every edge touching it.
fn deletion_scenario() {
    let mut flow = sales_flow();
    let outcome = flow.graph.delete_selection([NodeId::from("3")]);

    let removed: Vec<&str> = outcome.removed_edges.iter().map(|id| id.as_str()).collect();
    tracing::info!(
        removed_nodes = outcome.removed_nodes.len(),
        removed_edges = %removed.join(", "),
        nodes_left = flow.graph.node_count(),
        edges_left = flow.graph.edge_count(),
        "Condition node deleted from the sales journey"
    );
}

/// Simulates the conversations screen: an inbound message followed by a
/// delayed persona acknowledgement.
async fn conversation_demo(config: &ConsoleConfig, roster: SharedRoster) {
    let inbound = "Quero saber mais sobre os planos";
    let ack = {
        let roster = roster.lock().await;
        let Some(persona) = roster.get("whatsapp") else {
            tracing::warn!("WhatsApp persona missing from the roster");
            return;
        };
        persona.chat_ack(inbound)
    };

    let conversation = Arc::new(std::sync::Mutex::new(Conversation::new(Contact::new(
        "Visitante",
        "+55 11 90000-0000",
    ))));
    if let Ok(mut conversation) = conversation.lock() {
        conversation.record_inbound(inbound);
    }

    let delivery = Arc::clone(&conversation);
    let reply = PendingReply::spawn(Duration::from_millis(config.reply_delay_ms), move || {
        if let Ok(mut conversation) = delivery.lock() {
            conversation.record_reply(ack);
        }
    });
    tracing::info!(delay_ms = config.reply_delay_ms, "Reply scheduled");

    tokio::time::sleep(Duration::from_millis(config.reply_delay_ms + 100)).await;

    tracing::info!(delivered = reply.is_finished(), "Reply timer elapsed");
    if let Ok(conversation) = conversation.lock() {
        tracing::info!(
            preview = %conversation.preview(),
            messages = conversation.message_count(),
            "Conversation after the scheduled reply"
        );
    }
}

/// Walks the WhatsApp connection lifecycle: a send before pairing is
/// rejected, then QR pairing, messaging and the wire log.
fn whatsapp_demo() -> Result<(), Report<IntegrationError>> {
    let mut connection = WhatsAppConnection::new();

    if let Err(e) = connection.send_message("+55 11 99999-0001", "Olá!") {
        tracing::info!(error = %e, "Send rejected before pairing");
    }

    let qr = connection.generate_qr();
    tracing::info!(qr_len = qr.len(), "QR code issued, waiting for scan");

    connection.set_message_handler(Box::new(|message| {
        tracing::info!(
            from = %message.peer,
            content = %message.content,
            "Inbound WhatsApp message"
        );
    }));

    connection.connect_with_session(SessionData::new("+55 11 98888-0000"));

    let sent = connection.send_message("+55 11 99999-0001", "Olá! Aqui é a AgencyZen.")?;
    tracing::info!(to = %sent.peer, content = %sent.content, "Message sent");

    connection.simulate_incoming("+55 11 99999-0001", "Oi! Quero um orçamento.");

    let status = connection.status();
    tracing::info!(
        connected = status.connected,
        phone = status.phone.as_deref().unwrap_or("-"),
        messages = status.messages_count,
        "WhatsApp connection status"
    );
    Ok(())
}

/// Prints the image model catalog the settings screen offers.
fn image_catalog() {
    for model in &AVAILABLE_MODELS {
        tracing::info!(
            id = model.id,
            name = model.name,
            price = model.price,
            speed = model.speed,
            quality = model.quality,
            "Image model available"
        );
    }
}

/// Runs the simulated Replicate pipeline end to end. Without a
/// configured token this surfaces the dashboard's setup hint instead.
async fn image_generation_demo(settings: &Settings) {
    let backend = Arc::new(SimulatedBackend::succeeding_after(
        2,
        vec!["https://replicate.delivery/demo/post.png".to_string()],
    ));
    let token = settings
        .replicate_configured()
        .then(|| settings.replicate_key.clone());
    let generator =
        ImageGenerator::new(backend, token).with_poll_interval(Duration::from_millis(50));

    let request = ImageRequest::for_social(
        "lançamento da coleção de verão",
        &["azul", "dourado"],
        None,
    );
    match generator.generate(&request).await {
        Ok(generated) => tracing::info!(
            images = generated.images.len(),
            model = %generated.model,
            "Images generated"
        ),
        Err(e) => tracing::warn!(error = %e, "Image generation unavailable"),
    }
}
