//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether a game session is currently active.
    pub session_active: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let session_active = state.lock_session()?.is_some();
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        session_active,
    }))
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
