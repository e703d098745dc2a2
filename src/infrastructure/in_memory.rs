use crate::domain::ports::SimulationStore;
use crate::domain::simulation::Simulation;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for simulations.
///
/// Uses `Arc<RwLock<HashMap<String, Simulation>>>` so clones share the same map.
/// Data is lost when the process exits.
#[derive(Default, Clone)]
pub struct InMemorySimulationStore {
    simulations: Arc<RwLock<HashMap<String, Simulation>>>,
}

impl InMemorySimulationStore {
    /// Creates a new, empty in-memory simulation store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.simulations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.simulations.read().await.is_empty()
    }
}

#[async_trait]
impl SimulationStore for InMemorySimulationStore {
    async fn save(&self, simulation: Simulation) -> Result<Simulation> {
        let mut simulations = self.simulations.write().await;
        simulations.insert(simulation.id().to_owned(), simulation.clone());
        Ok(simulation)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Simulation>> {
        let simulations = self.simulations.read().await;
        Ok(simulations.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Simulation>> {
        let simulations = self.simulations.read().await;
        Ok(simulations.values().cloned().collect())
    }
}
