// src/state.rs
// Shared application state for HTTP handlers

use sqlx::SqlitePool;

use crate::analysis::AnalysisService;
use crate::auth::AuthService;
use crate::environment::EnvironmentStore;
use crate::goals::SleepGoalStore;
use crate::records::SleepRecordStore;

/// All services, constructed once at startup and shared as `Arc<AppState>`.
pub struct AppState {
    pub db: SqlitePool,
    pub auth_service: AuthService,
    pub record_store: SleepRecordStore,
    pub goal_store: SleepGoalStore,
    pub environment_store: EnvironmentStore,
    pub analysis: AnalysisService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            db: pool.clone(),
            auth_service: AuthService::new(pool.clone()),
            record_store: SleepRecordStore::new(pool.clone()),
            goal_store: SleepGoalStore::new(pool.clone()),
            environment_store: EnvironmentStore::new(pool.clone()),
            analysis: AnalysisService::new(pool),
        }
    }
}
