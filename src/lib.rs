// src/lib.rs

pub mod analysis;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod environment;
pub mod goals;
pub mod records;
pub mod state;

// Export commonly used items
pub use config::CONFIG;
pub use state::AppState;
