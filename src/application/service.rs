use crate::domain::ports::{NotifierRef, SimulationStoreRef};
use crate::domain::pricing::PricingEngine;
use crate::domain::simulation::{Simulation, SimulationRequest, SimulationResult};
use crate::error::{Result, SimulationError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Single-simulation workflow: price, persist, optionally notify.
///
/// Cheap to clone; every clone shares the same engine, store and notifier.
#[derive(Clone)]
pub struct SimulationService {
    engine: Arc<PricingEngine>,
    store: SimulationStoreRef,
    notifier: NotifierRef,
    notify_timeout: Duration,
}

impl SimulationService {
    pub fn new(
        engine: PricingEngine,
        store: SimulationStoreRef,
        notifier: NotifierRef,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            store,
            notifier,
            notify_timeout,
        }
    }

    /// Prices and persists `request`, then sends an individual notification
    /// when `notify` is set.
    ///
    /// Notification failures are logged and never affect the returned result.
    pub async fn simulate(
        &self,
        request: &SimulationRequest,
        notify: bool,
    ) -> Result<SimulationResult> {
        let simulation = self.price_and_save(request).await?;
        if notify {
            self.deliver_single(&simulation).await;
        }
        Ok(SimulationResult::from(simulation))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<SimulationResult> {
        self.store
            .find_by_id(id)
            .await?
            .map(SimulationResult::from)
            .ok_or_else(|| SimulationError::NotFound(id.to_owned()))
    }

    pub async fn find_all(&self) -> Result<Vec<SimulationResult>> {
        let simulations = self.store.find_all().await?;
        Ok(simulations.iter().map(SimulationResult::from).collect())
    }

    /// Validation errors short-circuit before storage is touched.
    pub(crate) async fn price_and_save(&self, request: &SimulationRequest) -> Result<Simulation> {
        let simulation = self.engine.price(request)?;
        let saved = self.store.save(simulation).await.map_err(|e| match e {
            SimulationError::Persistence(_) => e,
            other => SimulationError::Persistence(Box::new(other)),
        })?;
        info!(
            id = %saved.id(),
            installment = %saved.monthly_installment().round_dp(2),
            "simulation saved"
        );
        Ok(saved)
    }

    pub(crate) async fn deliver_single(&self, simulation: &Simulation) {
        self.deliver("single", self.notifier.send_single(simulation)).await;
    }

    pub(crate) async fn deliver_summary(&self, report: &str) {
        self.deliver("summary", self.notifier.send_summary(report)).await;
    }

    async fn deliver<F>(&self, kind: &'static str, send: F)
    where
        F: Future<Output = Result<()>>,
    {
        match tokio::time::timeout(self.notify_timeout, send).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(kind, error = %e, "notification failed"),
            Err(_) => warn!(
                kind,
                timeout_ms = self.notify_timeout.as_millis() as u64,
                "notification timed out"
            ),
        }
    }
}
