// src/api/http/users.rs

use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::auth::{AuthUser, UpdateProfileRequest, User};
use crate::state::AppState;

pub fn create_users_router() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(me).put(update_me).delete(delete_me))
}

async fn me(State(state): State<Arc<AppState>>, user: AuthUser) -> ApiResult<Json<User>> {
    let profile = state
        .auth_service
        .verify_user_id(user.id)
        .await
        .map_err(|e| ApiError::not_found(e.to_string()))?;

    Ok(Json(profile))
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let profile = state
        .auth_service
        .update_profile(user.id, req)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(Json(profile))
}

async fn delete_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    state.auth_service.delete_account(user.id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
