//! Journey persistence seam.
//!
//! Views and the console go through [`FlowStore`] so journeys can
//! live anywhere; the in-memory implementation is the only one this
//! workspace ships.

use crate::definition::{Flow, FlowSummary};
use crate::error::StoreError;
use agencyzen_core::FlowId;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage for journey definitions.
#[async_trait]
pub trait FlowStore: Send + Sync {
    /// Stores a new journey and returns its id.
    async fn create(&self, flow: Flow) -> Result<FlowId, StoreError>;

    /// Fetches a journey by id.
    async fn get(&self, flow_id: FlowId) -> Result<Flow, StoreError>;

    /// Lists all journeys as summaries, sorted by name.
    async fn list(&self) -> Result<Vec<FlowSummary>, StoreError>;

    /// Replaces an existing journey.
    async fn update(&self, flow: Flow) -> Result<(), StoreError>;

    /// Removes a journey.
    async fn delete(&self, flow_id: FlowId) -> Result<(), StoreError>;
}

/// Keeps journeys in a map behind an async lock.
#[derive(Default)]
pub struct InMemoryFlowStore {
    flows: RwLock<HashMap<FlowId, Flow>>,
}

impl InMemoryFlowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the canned sales journey.
    #[must_use]
    pub fn with_sample() -> Self {
        let flow = crate::sample::sales_flow();
        let mut flows = HashMap::new();
        flows.insert(flow.id, flow);
        Self {
            flows: RwLock::new(flows),
        }
    }
}

#[async_trait]
impl FlowStore for InMemoryFlowStore {
    async fn create(&self, flow: Flow) -> Result<FlowId, StoreError> {
        let flow_id = flow.id;
        self.flows.write().await.insert(flow_id, flow);
        tracing::debug!(flow_id = %flow_id, "flow created");
        Ok(flow_id)
    }

    async fn get(&self, flow_id: FlowId) -> Result<Flow, StoreError> {
        self.flows
            .read()
            .await
            .get(&flow_id)
            .cloned()
            .ok_or(StoreError::FlowNotFound { flow_id })
    }

    async fn list(&self) -> Result<Vec<FlowSummary>, StoreError> {
        let flows = self.flows.read().await;
        let mut summaries: Vec<FlowSummary> = flows.values().map(FlowSummary::from).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn update(&self, flow: Flow) -> Result<(), StoreError> {
        let mut flows = self.flows.write().await;
        if !flows.contains_key(&flow.id) {
            return Err(StoreError::FlowNotFound { flow_id: flow.id });
        }
        flows.insert(flow.id, flow);
        Ok(())
    }

    async fn delete(&self, flow_id: FlowId) -> Result<(), StoreError> {
        self.flows
            .write()
            .await
            .remove(&flow_id)
            .map(|_| {
                tracing::debug!(flow_id = %flow_id, "flow deleted");
            })
            .ok_or(StoreError::FlowNotFound { flow_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get() {
        let store = InMemoryFlowStore::new();
        let flow = Flow::new("Boas-vindas");
        let flow_id = store.create(flow).await.expect("create");

        let fetched = store.get(flow_id).await.expect("get");
        assert_eq!(fetched.id, flow_id);
        assert_eq!(fetched.name, "Boas-vindas");
    }

    #[tokio::test]
    async fn get_missing_flow_errors() {
        let store = InMemoryFlowStore::new();
        let flow_id = FlowId::new();

        let result = store.get(flow_id).await;
        assert_eq!(result.unwrap_err(), StoreError::FlowNotFound { flow_id });
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let store = InMemoryFlowStore::new();
        store.create(Flow::new("Zum")).await.expect("create");
        store.create(Flow::new("Alfa")).await.expect("create");

        let summaries = store.list().await.expect("list");
        let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alfa", "Zum"]);
    }

    #[tokio::test]
    async fn update_requires_existing_flow() {
        let store = InMemoryFlowStore::new();
        let mut flow = Flow::new("Original");
        let flow_id = store.create(flow.clone()).await.expect("create");

        flow.name = "Renomeado".to_string();
        store.update(flow.clone()).await.expect("update");
        let fetched = store.get(flow_id).await.expect("get");
        assert_eq!(fetched.name, "Renomeado");

        let stranger = Flow::new("Desconhecido");
        let result = store.update(stranger.clone()).await;
        assert_eq!(
            result.unwrap_err(),
            StoreError::FlowNotFound {
                flow_id: stranger.id
            }
        );
    }

    #[tokio::test]
    async fn delete_removes_flow() {
        let store = InMemoryFlowStore::new();
        let flow_id = store.create(Flow::new("Descartável")).await.expect("create");

        store.delete(flow_id).await.expect("delete");
        let result = store.delete(flow_id).await;
        assert_eq!(result.unwrap_err(), StoreError::FlowNotFound { flow_id });
    }

    #[tokio::test]
    async fn sample_seed_contains_the_sales_journey() {
        let store = InMemoryFlowStore::with_sample();
        let summaries = store.list().await.expect("list");

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "fluxo_vendas");
        assert_eq!(summaries[0].node_count, 6);
        assert_eq!(summaries[0].edge_count, 6);
    }
}
