// src/api/http/records.rs

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::analysis::SleepStats;
use crate::auth::AuthUser;
use crate::records::{
    validate_quality, ListOptions, NewSleepRecord, SleepRecord, UpdateSleepRecord,
};
use crate::state::AppState;

pub fn create_records_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/recent", get(recent_records))
        .route("/stats", get(record_stats))
        .route(
            "/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
}

async fn list_records(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(opts): Query<ListOptions>,
) -> ApiResult<Json<Vec<SleepRecord>>> {
    let records = state.record_store.list(user.id, &opts).await?;
    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    limit: Option<i64>,
}

async fn recent_records(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<SleepRecord>>> {
    let limit = query.limit.unwrap_or(7).clamp(1, 100);
    let records = state.record_store.recent(user.id, limit).await?;
    Ok(Json(records))
}

async fn record_stats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<SleepStats>> {
    let stats = state.analysis.stats(user.id).await?;
    Ok(Json(stats))
}

async fn create_record(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<NewSleepRecord>,
) -> ApiResult<(StatusCode, Json<SleepRecord>)> {
    validate_quality(req.sleep_quality).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let record = state.record_store.create(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<SleepRecord>> {
    let record = owned_record(&state, &user, id).await?;
    Ok(Json(record))
}

async fn update_record(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSleepRecord>,
) -> ApiResult<Json<SleepRecord>> {
    owned_record(&state, &user, id).await?;
    if let Some(quality) = req.sleep_quality {
        validate_quality(quality).map_err(|e| ApiError::bad_request(e.to_string()))?;
    }

    let updated = state
        .record_store
        .update(id, req)
        .await?
        .ok_or_else(|| ApiError::not_found("Sleep record not found"))?;

    Ok(Json(updated))
}

async fn delete_record(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    owned_record(&state, &user, id).await?;
    state.record_store.delete(id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Fetch a record, treating another user's record the same as a missing
/// one so ids are not probeable.
async fn owned_record(state: &AppState, user: &AuthUser, id: i64) -> ApiResult<SleepRecord> {
    let record = state
        .record_store
        .get(id)
        .await?
        .filter(|r| r.user_id == user.id)
        .ok_or_else(|| ApiError::not_found("Sleep record not found"))?;

    Ok(record)
}
