// src/api/http/environment.rs

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ApiResult;
use crate::auth::AuthUser;
use crate::environment::{EnvironmentReading, NewEnvironmentReading};
use crate::state::AppState;

pub fn create_environment_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_readings).post(create_reading))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

async fn list_readings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<EnvironmentReading>>> {
    let limit = query.limit.unwrap_or(30).clamp(1, 100);
    let readings = state.environment_store.recent(user.id, limit).await?;
    Ok(Json(readings))
}

async fn create_reading(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<NewEnvironmentReading>,
) -> ApiResult<(StatusCode, Json<EnvironmentReading>)> {
    let reading = state.environment_store.create(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}
