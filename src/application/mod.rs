//! Application layer orchestrating the pricing engine, storage and notifications.
//!
//! [`service::SimulationService`] handles single simulations and lookups;
//! [`batch::BatchOrchestrator`] fans a batch out onto `tokio` tasks and joins
//! them before the single summary notification is sent.

pub mod batch;
pub mod service;
