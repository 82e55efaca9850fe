// src/goals/mod.rs
// Sleep goal model: one active goal per user

pub mod store;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub use store::SleepGoalStore;

/// A user's target bedtime, wake time, and quality. Singular per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SleepGoal {
    pub id: i64,
    pub user_id: i64,
    /// Target bedtime as "HH:MM" clock time
    pub bedtime_time: String,
    /// Target wake time as "HH:MM" clock time
    pub wakeup_time: String,
    pub target_sleep_quality: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSleepGoal {
    pub bedtime_time: String,
    pub wakeup_time: String,
    pub target_sleep_quality: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSleepGoal {
    pub bedtime_time: Option<String>,
    pub wakeup_time: Option<String>,
    pub target_sleep_quality: Option<i64>,
}

pub fn validate_clock_time(value: &str) -> Result<()> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| anyhow!("Expected clock time in HH:MM format, got '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time_format() {
        assert!(validate_clock_time("23:00").is_ok());
        assert!(validate_clock_time("07:30").is_ok());
        assert!(validate_clock_time("7:30").is_ok());
        assert!(validate_clock_time("24:00").is_err());
        assert!(validate_clock_time("23h00").is_err());
        assert!(validate_clock_time("").is_err());
    }
}
