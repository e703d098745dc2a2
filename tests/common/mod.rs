#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use loan_sim::application::batch::BatchOrchestrator;
use loan_sim::application::service::SimulationService;
use loan_sim::domain::ports::{Notifier, NotifierRef, SimulationStore, SimulationStoreRef};
use loan_sim::domain::pricing::{FixedClock, PricingEngine, RateTable};
use loan_sim::domain::simulation::{RateType, Simulation, SimulationRequest};
use loan_sim::error::{Result, SimulationError};
use loan_sim::infrastructure::in_memory::InMemorySimulationStore;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub fn engine() -> PricingEngine {
    PricingEngine::new(RateTable::default(), Arc::new(FixedClock(today())))
}

/// A request from a 34 year old borrower.
pub fn request(principal: Decimal, term_months: i32) -> SimulationRequest {
    let birth = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    SimulationRequest::new(principal, birth, term_months, RateType::Fixed)
}

pub fn services(
    store: SimulationStoreRef,
    notifier: NotifierRef,
    max_concurrency: usize,
) -> (SimulationService, BatchOrchestrator) {
    services_with_timeout(store, notifier, max_concurrency, Duration::from_secs(1))
}

pub fn services_with_timeout(
    store: SimulationStoreRef,
    notifier: NotifierRef,
    max_concurrency: usize,
    notify_timeout: Duration,
) -> (SimulationService, BatchOrchestrator) {
    let service = SimulationService::new(engine(), store, notifier, notify_timeout);
    let batch = BatchOrchestrator::new(service.clone(), max_concurrency);
    (service, batch)
}

/// Never completes a send.
pub struct HangingNotifier;

#[async_trait]
impl Notifier for HangingNotifier {
    async fn send_single(&self, _simulation: &Simulation) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }

    async fn send_summary(&self, _report: &str) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Fails every send.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_single(&self, _simulation: &Simulation) -> Result<()> {
        Err(SimulationError::Notification("mail relay refused".into()))
    }

    async fn send_summary(&self, _report: &str) -> Result<()> {
        Err(SimulationError::Notification("mail relay refused".into()))
    }
}

/// Rejects every save whose principal equals `poison`, delegating the rest.
#[derive(Clone)]
pub struct FailingStore {
    pub inner: InMemorySimulationStore,
    pub poison: Decimal,
}

impl FailingStore {
    pub fn new(poison: Decimal) -> Self {
        Self {
            inner: InMemorySimulationStore::new(),
            poison,
        }
    }
}

#[async_trait]
impl SimulationStore for FailingStore {
    async fn save(&self, simulation: Simulation) -> Result<Simulation> {
        if simulation.principal() == self.poison {
            return Err(SimulationError::persistence(std::io::Error::other(
                "write rejected",
            )));
        }
        self.inner.save(simulation).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Simulation>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Simulation>> {
        self.inner.find_all().await
    }
}

/// Delays every save by `delay`.
#[derive(Clone)]
pub struct SlowStore {
    pub inner: InMemorySimulationStore,
    pub delay: Duration,
}

#[async_trait]
impl SimulationStore for SlowStore {
    async fn save(&self, simulation: Simulation) -> Result<Simulation> {
        tokio::time::sleep(self.delay).await;
        self.inner.save(simulation).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Simulation>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Simulation>> {
        self.inner.find_all().await
    }
}

pub fn write_requests_csv(path: &Path, rows: &[[&str; 4]]) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["principal", "birth_date", "term_months", "rate_type"])?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}
