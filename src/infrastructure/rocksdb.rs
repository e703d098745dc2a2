use crate::domain::ports::SimulationStore;
use crate::domain::simulation::Simulation;
use crate::error::{Result, SimulationError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing priced simulations.
pub const CF_SIMULATIONS: &str = "simulations";

/// A persistent store implementation using RocksDB.
///
/// Simulations are stored as JSON under their id in a dedicated Column Family.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbSimulationStore {
    db: Arc<DB>,
}

impl RocksDbSimulationStore {
    /// Opens or creates a RocksDB instance at `path`.
    ///
    /// Ensures that the "simulations" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf = ColumnFamilyDescriptor::new(CF_SIMULATIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn missing_cf() -> SimulationError {
        SimulationError::persistence(std::io::Error::other(
            "Simulations column family not found",
        ))
    }
}

#[async_trait]
impl SimulationStore for RocksDbSimulationStore {
    async fn save(&self, simulation: Simulation) -> Result<Simulation> {
        let cf = self.db.cf_handle(CF_SIMULATIONS).ok_or_else(Self::missing_cf)?;

        let value = serde_json::to_vec(&simulation)?;
        self.db.put_cf(&cf, simulation.id().as_bytes(), value)?;

        Ok(simulation)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Simulation>> {
        let cf = self.db.cf_handle(CF_SIMULATIONS).ok_or_else(Self::missing_cf)?;

        match self.db.get_cf(&cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Simulation>> {
        let cf = self.db.cf_handle(CF_SIMULATIONS).ok_or_else(Self::missing_cf)?;

        let mut simulations = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            simulations.push(serde_json::from_slice(&value)?);
        }

        Ok(simulations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::{FixedClock, PricingEngine, RateTable};
    use crate::domain::simulation::{RateType, SimulationRequest};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn priced() -> Simulation {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let engine = PricingEngine::new(RateTable::default(), Arc::new(FixedClock(today)));
        let birth = NaiveDate::from_ymd_opt(1970, 3, 9).unwrap();
        engine
            .price(&SimulationRequest::new(dec!(15000), birth, 48, RateType::Variable))
            .unwrap()
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDbSimulationStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_SIMULATIONS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_simulation_store() {
        let dir = tempdir().unwrap();
        let store = RocksDbSimulationStore::open(dir.path()).unwrap();
        let sim = priced();

        store.save(sim.clone()).await.unwrap();

        let retrieved = store.find_by_id(sim.id()).await.unwrap().unwrap();
        assert_eq!(retrieved, sim);

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![sim]);

        assert!(store.find_by_id("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();
        let sim = priced();
        {
            let store = RocksDbSimulationStore::open(dir.path()).unwrap();
            store.save(sim.clone()).await.unwrap();
        }

        let store = RocksDbSimulationStore::open(dir.path()).unwrap();
        assert_eq!(store.find_by_id(sim.id()).await.unwrap(), Some(sim));
    }
}
