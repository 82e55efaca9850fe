// src/api/http/analysis.rs

use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::ApiResult;
use crate::analysis::{AnalysisReport, EnvironmentImpact, MonthlyPattern, WeekdayPattern};
use crate::auth::AuthUser;
use crate::state::AppState;

pub fn create_analysis_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(full_report))
        .route("/pattern", get(patterns))
        .route("/weekly", get(weekly))
        .route("/monthly", get(monthly))
        .route("/environment", get(environment))
        .route("/insight", get(insight))
}

async fn full_report(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<AnalysisReport>> {
    let report = state.analysis.report(user.id).await?;
    Ok(Json(report))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PatternResponse {
    weekly: Vec<WeekdayPattern>,
    monthly: Vec<MonthlyPattern>,
}

async fn patterns(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<PatternResponse>> {
    let weekly = state.analysis.weekly(user.id).await?;
    let monthly = state.analysis.monthly(user.id).await?;

    Ok(Json(PatternResponse { weekly, monthly }))
}

async fn weekly(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<WeekdayPattern>>> {
    let pattern = state.analysis.weekly(user.id).await?;
    Ok(Json(pattern))
}

async fn monthly(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<MonthlyPattern>>> {
    let pattern = state.analysis.monthly(user.id).await?;
    Ok(Json(pattern))
}

async fn environment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<EnvironmentImpact>>> {
    let impacts = state.analysis.environment(user.id).await?;
    Ok(Json(impacts))
}

async fn insight(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let message = state.analysis.insight(user.id).await?;
    Ok(Json(serde_json::json!({ "insight": message })))
}
