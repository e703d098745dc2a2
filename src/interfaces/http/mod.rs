//! HTTP API over the simulation service.
//!
//! - `POST /simulations` prices, saves and (unless `?notify=false`) notifies
//! - `GET /simulations/{id}` looks up one simulation
//! - `GET /simulations` lists every stored simulation
//! - `POST /simulations/batch` accepts a batch and processes it in the background
//! - `GET /health` liveness probe

pub mod error;
pub mod handlers;

use crate::application::batch::BatchOrchestrator;
use crate::application::service::SimulationService;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: SimulationService,
    pub batch: BatchOrchestrator,
}

impl AppState {
    pub fn new(service: SimulationService, batch: BatchOrchestrator) -> Self {
        Self { service, batch }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/simulations",
            post(handlers::create_simulation).get(handlers::list_simulations),
        )
        .route("/simulations/batch", post(handlers::submit_batch))
        .route("/simulations/{id}", get(handlers::get_simulation))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
