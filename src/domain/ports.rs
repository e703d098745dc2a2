use super::simulation::Simulation;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SimulationStore: Send + Sync {
    async fn save(&self, simulation: Simulation) -> Result<Simulation>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Simulation>>;
    async fn find_all(&self) -> Result<Vec<Simulation>>;
}

/// Best-effort delivery of simulation reports.
///
/// Callers log and discard errors returned here.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_single(&self, simulation: &Simulation) -> Result<()>;
    async fn send_summary(&self, report: &str) -> Result<()>;
}

pub type SimulationStoreRef = Arc<dyn SimulationStore>;
pub type NotifierRef = Arc<dyn Notifier>;
