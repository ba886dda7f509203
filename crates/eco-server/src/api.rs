//! HTTP handlers for the renderer.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use eco_core::{CensusGrid, RainEvent, SimulationConfig, WorldStats};
use eco_world::World;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

#[derive(Clone)]
pub struct AppState {
    pub world: Arc<World>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/census", get(get_census))
        .route("/api/rain/last", get(take_last_rain))
        .route("/api/rain", post(rain))
        .route("/api/stats", get(get_stats))
        .route("/api/config", get(get_config))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_census(State(state): State<AppState>) -> Json<CensusGrid> {
    Json(state.world.census())
}

/// The most recent rain; reading it consumes it
pub async fn take_last_rain(State(state): State<AppState>) -> Json<Option<RainEvent>> {
    Json(state.world.take_last_rain())
}

#[derive(Debug, Deserialize)]
pub struct RainRequest {
    x: i32,
    y: i32,
    amount: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RainResponse {
    pub water_level: i32,
    pub drowned: usize,
}

pub async fn rain(
    State(state): State<AppState>,
    Json(req): Json<RainRequest>,
) -> Result<Json<RainResponse>, ApiError> {
    let drowned = state.world.rain_on_cell(req.x, req.y, req.amount)?;
    let water_level = state.world.cell_water_level(req.x, req.y)?;
    crate::record_counter!("manual_rain", 1, x = req.x, y = req.y, amount = req.amount);

    Ok(Json(RainResponse {
        water_level,
        drowned,
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<WorldStats> {
    Json(state.world.stats())
}

pub async fn get_config(State(state): State<AppState>) -> Json<SimulationConfig> {
    Json(state.world.config().clone())
}

// Error handling
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

impl From<eco_core::Error> for ApiError {
    fn from(err: eco_core::Error) -> Self {
        match err {
            eco_core::Error::OutOfBounds { .. } => {
                warn!("Rejected request: {}", err);
                ApiError::BadRequest(err.to_string())
            }
            other => {
                error!("Core error: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}
