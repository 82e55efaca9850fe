// src/main.rs

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use somnus_backend::api::http::{
    create_analysis_router, create_auth_router, create_environment_router, create_goals_router,
    create_records_router, create_users_router, health_check, liveness_check, readiness_check,
};
use somnus_backend::config::CONFIG;
use somnus_backend::db;
use somnus_backend::state::AppState;
use tower_http::cors::{Any, CorsLayer};

/// Graceful shutdown signal handler for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let level = Level::from_str(&CONFIG.logging.level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    CONFIG.validate()?;

    info!("Starting Somnus backend");
    info!(
        "Insight generator: {}",
        if CONFIG.insight.api_key.is_some() {
            "remote with rule-based fallback"
        } else {
            "rule-based"
        }
    );

    let pool = db::create_pool(&CONFIG.database.url, CONFIG.database.max_connections).await?;
    db::run_migrations(&pool).await?;

    let app_state = Arc::new(AppState::new(pool));

    let app = Router::new()
        // Health endpoints for load balancers
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .nest("/api/auth", create_auth_router())
        .nest("/api/users", create_users_router())
        .nest("/api/records", create_records_router())
        .nest("/api/goals", create_goals_router())
        .nest("/api/environment", create_environment_router())
        .nest("/api/analysis", create_analysis_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state);

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Listening on http://{}", bind_address);
    info!("Health endpoints: /health, /ready, /live");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Shutdown complete");

    Ok(())
}
