// src/api/http/mod.rs

pub mod analysis;
pub mod auth;
pub mod environment;
pub mod error;
pub mod goals;
pub mod health;
pub mod records;
pub mod users;

pub use analysis::create_analysis_router;
pub use auth::create_auth_router;
pub use environment::create_environment_router;
pub use error::{ApiError, ApiResult};
pub use goals::create_goals_router;
pub use health::{health_check, liveness_check, readiness_check};
pub use records::create_records_router;
pub use users::create_users_router;
