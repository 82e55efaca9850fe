// src/api/http/auth.rs

use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::auth::{verify_token, AuthResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;

pub fn create_auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify", post(verify))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .register(req)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(Json(response))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .login(req)
        .await
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    Ok(Json(response))
}

#[derive(serde::Deserialize)]
struct VerifyRequest {
    token: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    valid: bool,
    user_id: Option<i64>,
    email: Option<String>,
}

/// Token introspection. Always 200; validity is carried in the body.
async fn verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> Json<VerifyResponse> {
    let invalid = VerifyResponse {
        valid: false,
        user_id: None,
        email: None,
    };

    let claims = match verify_token(&req.token) {
        Ok(claims) => claims,
        Err(_) => return Json(invalid),
    };
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return Json(invalid),
    };

    match state.auth_service.verify_user_id(user_id).await {
        Ok(user) => Json(VerifyResponse {
            valid: true,
            user_id: Some(user.id),
            email: Some(user.email),
        }),
        Err(_) => Json(invalid),
    }
}
