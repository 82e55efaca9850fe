// src/environment/mod.rs
// Bedroom environment readings used by the correlation analysis

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use store::EnvironmentStore;

/// A point-in-time snapshot of bedroom conditions. Any factor may be absent;
/// the analysis treats missing values as 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentReading {
    pub id: i64,
    pub user_id: i64,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub noise_level: Option<f64>,
    pub light_level: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnvironmentReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub noise_level: Option<f64>,
    pub light_level: Option<f64>,
    /// Defaults to the time of submission when absent.
    pub recorded_at: Option<DateTime<Utc>>,
}

/// The factors the analysis correlates against sleep quality, by wire name.
pub const FACTORS: [&str; 4] = ["temperature", "humidity", "noiseLevel", "lightLevel"];

impl EnvironmentReading {
    /// Factor value by wire name, with missing readings coerced to 0.0.
    pub fn factor(&self, name: &str) -> f64 {
        let value = match name {
            "temperature" => self.temperature,
            "humidity" => self.humidity,
            "noiseLevel" => self.noise_level,
            "lightLevel" => self.light_level,
            _ => None,
        };
        value.unwrap_or(0.0)
    }
}
