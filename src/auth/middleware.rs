// src/auth/middleware.rs
// Bearer-token extractor for protected routes

use axum::{extract::FromRequestParts, http::request::Parts};

use super::jwt::verify_token;
use crate::api::http::error::ApiError;

/// Authenticated user identity, extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization header"))?;

        let claims =
            verify_token(token).map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        let id = claims
            .user_id()
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            id,
            email: claims.email,
        })
    }
}
