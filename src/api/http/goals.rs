// src/api/http/goals.rs

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::auth::AuthUser;
use crate::goals::{NewSleepGoal, SleepGoal, UpdateSleepGoal};
use crate::state::AppState;

pub fn create_goals_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_goal).post(create_goal))
        .route("/{id}", axum::routing::put(update_goal).delete(delete_goal))
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Option<SleepGoal>>> {
    let goal = state.goal_store.get(user.id).await?;
    Ok(Json(goal))
}

/// Creating a goal replaces any existing one; a user has a single goal.
async fn create_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<NewSleepGoal>,
) -> ApiResult<(StatusCode, Json<SleepGoal>)> {
    let goal = state
        .goal_store
        .replace(user.id, req)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(goal)))
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSleepGoal>,
) -> ApiResult<Json<SleepGoal>> {
    owned_goal(&state, &user, id).await?;

    let updated = state
        .goal_store
        .update(id, req)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Sleep goal not found"))?;

    Ok(Json(updated))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    owned_goal(&state, &user, id).await?;
    state.goal_store.delete(id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

async fn owned_goal(state: &AppState, user: &AuthUser, id: i64) -> ApiResult<SleepGoal> {
    let goal = state
        .goal_store
        .get(user.id)
        .await?
        .filter(|g| g.id == id)
        .ok_or_else(|| ApiError::not_found("Sleep goal not found"))?;

    Ok(goal)
}
