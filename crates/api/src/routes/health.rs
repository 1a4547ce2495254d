use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `postgres` or `memory`.
    pub backend: &'static str,
    /// Whether the database is reachable; absent for the in-memory backing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_healthy: Option<bool>,
}

/// GET /health -- returns service and storage health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (backend, db_healthy) = match &state.pool {
        Some(pool) => ("postgres", Some(agenda_db::health_check(pool).await.is_ok())),
        None => ("memory", None),
    };

    let status = if db_healthy == Some(false) { "degraded" } else { "ok" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        backend,
        db_healthy,
    })
}

/// Mount health check routes (root level, outside `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
