use super::service::SimulationService;
use crate::domain::report;
use crate::domain::simulation::{SimulationRequest, SimulationResult};
use crate::error::{Result, SimulationError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// An item of a batch that produced no result.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the request in the submitted batch.
    pub index: usize,
    pub error: SimulationError,
}

/// Everything a single batch produced, ordered by input position.
#[derive(Debug)]
pub struct BatchOutcome {
    pub batch_id: String,
    pub results: Vec<SimulationResult>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Runs many simulations and reports them with one summary notification.
///
/// Each batch is driven by its own spawned coordinator task. Items fan out
/// onto a [`JoinSet`]; the coordinator is the only owner of the outcome and
/// drains the set before the summary is rendered and sent exactly once.
#[derive(Clone)]
pub struct BatchOrchestrator {
    service: SimulationService,
    limit: Arc<Semaphore>,
}

impl BatchOrchestrator {
    /// `max_concurrency` bounds in-flight items across every batch of this
    /// orchestrator; zero is treated as one.
    pub fn new(service: SimulationService, max_concurrency: usize) -> Self {
        Self {
            service,
            limit: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Starts processing `requests` in the background and returns at once.
    ///
    /// Dropping the handle does not stop the batch.
    pub fn submit(&self, requests: Vec<SimulationRequest>) -> JoinHandle<BatchOutcome> {
        let batch_id = Uuid::new_v4().to_string();
        let span = info_span!("batch", id = %batch_id, items = requests.len());
        tokio::spawn(execute(self.clone(), batch_id, requests).instrument(span))
    }

    /// Processes `requests` and waits for the summary notification to be sent.
    ///
    /// Per-item errors are reported in the outcome, never returned. Cancelling
    /// this future leaves the batch running to completion.
    pub async fn run_batch(&self, requests: Vec<SimulationRequest>) -> Result<BatchOutcome> {
        self.submit(requests)
            .await
            .map_err(|e| SimulationError::Internal(format!("batch coordinator failed: {e}")))
    }
}

async fn execute(
    orchestrator: BatchOrchestrator,
    batch_id: String,
    requests: Vec<SimulationRequest>,
) -> BatchOutcome {
    let mut items = JoinSet::new();
    let mut positions = HashMap::with_capacity(requests.len());

    for (index, request) in requests.into_iter().enumerate() {
        let service = orchestrator.service.clone();
        let limit = Arc::clone(&orchestrator.limit);
        let handle = items.spawn(async move {
            let _permit = limit
                .acquire_owned()
                .await
                .map_err(|e| SimulationError::Internal(e.to_string()))?;
            service.price_and_save(&request).await
        });
        positions.insert(handle.id(), index);
    }

    let mut results = Vec::new();
    let mut failures = Vec::new();
    while let Some(joined) = items.join_next_with_id().await {
        let (id, settled) = match joined {
            Ok((id, settled)) => (id, settled),
            Err(e) => (e.id(), Err(SimulationError::Internal(e.to_string()))),
        };
        // Every spawned task id was recorded above.
        let index = positions.get(&id).copied().unwrap_or(usize::MAX);
        match settled {
            Ok(simulation) => results.push((index, SimulationResult::from(simulation))),
            Err(error) => {
                warn!(index, error = %error, "batch item failed");
                failures.push(BatchFailure { index, error });
            }
        }
    }

    results.sort_by_key(|(index, _)| *index);
    failures.sort_by_key(|failure| failure.index);
    let results: Vec<SimulationResult> = results.into_iter().map(|(_, result)| result).collect();

    let summary = report::render_summary(&results, failures.len());
    orchestrator.service.deliver_summary(&summary).await;

    info!(
        succeeded = results.len(),
        failed = failures.len(),
        "batch completed"
    );

    BatchOutcome {
        batch_id,
        results,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SimulationStore;
    use crate::domain::pricing::{FixedClock, PricingEngine, RateTable};
    use crate::domain::simulation::RateType;
    use crate::infrastructure::in_memory::InMemorySimulationStore;
    use crate::infrastructure::notifier::{InMemoryNotifier, SUMMARY_SUBJECT};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn orchestrator(
        store: InMemorySimulationStore,
        notifier: InMemoryNotifier,
        max_concurrency: usize,
    ) -> BatchOrchestrator {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let engine = PricingEngine::new(RateTable::default(), Arc::new(FixedClock(today)));
        let service = SimulationService::new(
            engine,
            Arc::new(store),
            Arc::new(notifier),
            Duration::from_secs(1),
        );
        BatchOrchestrator::new(service, max_concurrency)
    }

    fn request(principal: Decimal) -> SimulationRequest {
        let birth = NaiveDate::from_ymd_opt(1985, 6, 15).unwrap();
        SimulationRequest::new(principal, birth, 24, RateType::Variable)
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let store = InMemorySimulationStore::new();
        let notifier = InMemoryNotifier::default();
        let batch = orchestrator(store.clone(), notifier.clone(), 4);

        let principals = [dec!(100), dec!(200), dec!(300), dec!(400), dec!(500)];
        let outcome = batch
            .run_batch(principals.iter().copied().map(request).collect())
            .await
            .unwrap();

        let got: Vec<Decimal> = outcome.results.iter().map(|r| r.principal).collect();
        assert_eq!(got, principals);
        assert_eq!(store.len().await, 5);
        assert_eq!(notifier.sent_with_subject(SUMMARY_SUBJECT).await.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_carry_their_position() {
        let store = InMemorySimulationStore::new();
        let notifier = InMemoryNotifier::default();
        let batch = orchestrator(store.clone(), notifier.clone(), 2);

        let outcome = batch
            .run_batch(vec![request(dec!(100)), request(dec!(0)), request(dec!(300))])
            .await
            .unwrap();

        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.failures[0].index, 1);
        assert!(matches!(outcome.failures[0].error, SimulationError::InvalidAmount));
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_still_notifies_once() {
        let notifier = InMemoryNotifier::default();
        let batch = orchestrator(InMemorySimulationStore::new(), notifier.clone(), 1);

        let outcome = batch.run_batch(Vec::new()).await.unwrap();

        assert_eq!(outcome.total(), 0);
        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("<tbody></tbody>"));
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let store = InMemorySimulationStore::new();
        let batch = orchestrator(store.clone(), InMemoryNotifier::default(), 0);

        let outcome = batch
            .run_batch(vec![request(dec!(1)), request(dec!(2))])
            .await
            .unwrap();

        assert_eq!(outcome.succeeded(), 2);
    }
}
