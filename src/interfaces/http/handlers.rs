use super::AppState;
use super::error::ApiResult;
use crate::domain::simulation::{SimulationRequest, SimulationResult};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

fn notify_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct SimulateParams {
    /// Send an individual notification once the simulation is saved.
    #[serde(default = "notify_by_default")]
    pub notify: bool,
}

/// Acknowledgement returned before a batch is processed.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchAccepted {
    pub status: String,
    pub items: usize,
    pub message: String,
}

/// `POST /simulations`
pub async fn create_simulation(
    State(state): State<AppState>,
    Query(params): Query<SimulateParams>,
    Json(request): Json<SimulationRequest>,
) -> ApiResult<Json<SimulationResult>> {
    let result = state.service.simulate(&request, params.notify).await?;
    Ok(Json(result))
}

/// `GET /simulations/{id}`
pub async fn get_simulation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SimulationResult>> {
    Ok(Json(state.service.find_by_id(&id).await?))
}

/// `GET /simulations`
pub async fn list_simulations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SimulationResult>>> {
    Ok(Json(state.service.find_all().await?))
}

/// `POST /simulations/batch`
///
/// Always answers 202; results are delivered by the summary notification.
pub async fn submit_batch(
    State(state): State<AppState>,
    Json(requests): Json<Vec<SimulationRequest>>,
) -> (StatusCode, Json<BatchAccepted>) {
    let items = requests.len();
    drop(state.batch.submit(requests));

    (
        StatusCode::ACCEPTED,
        Json(BatchAccepted {
            status: "accepted".into(),
            items,
            message: "Your request is being processed. You will receive a notification with the results shortly.".into(),
        }),
    )
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
