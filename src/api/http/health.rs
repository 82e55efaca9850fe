// src/api/http/health.rs

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "somnus-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness includes a database round-trip.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(json!({ "status": "ready" })))
}

pub async fn liveness_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "alive" }))
}
