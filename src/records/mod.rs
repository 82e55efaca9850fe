// src/records/mod.rs
// Sleep record model and input validation

pub mod store;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use store::SleepRecordStore;

/// One logged sleep interval with a quality rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
    pub id: i64,
    pub user_id: i64,
    pub sleep_start: DateTime<Utc>,
    pub sleep_end: DateTime<Utc>,
    pub sleep_quality: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SleepRecord {
    /// Duration of this interval in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        (self.sleep_end - self.sleep_start).num_seconds() as f64 / 3600.0
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSleepRecord {
    pub sleep_start: DateTime<Utc>,
    pub sleep_end: DateTime<Utc>,
    pub sleep_quality: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSleepRecord {
    pub sleep_start: Option<DateTime<Utc>>,
    pub sleep_end: Option<DateTime<Utc>>,
    pub sleep_quality: Option<i64>,
    pub notes: Option<String>,
}

/// Listing options for record queries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A wake time at or before the bedtime clock-value means the sleeper woke
/// the next calendar day; shift the end forward by one day.
pub fn normalize_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    if end <= start {
        end + Duration::days(1)
    } else {
        end
    }
}

pub fn validate_quality(quality: i64) -> Result<()> {
    if (1..=5).contains(&quality) {
        Ok(())
    } else {
        Err(anyhow!("Sleep quality must be between 1 and 5"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_keeps_valid_interval() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 7, 0, 0).unwrap();

        assert_eq!(normalize_interval(start, end), end);
    }

    #[test]
    fn test_normalize_shifts_wake_to_next_day() {
        // Woke "earlier" on the clock than bedtime: 23:00 -> 07:00 same day
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();

        let normalized = normalize_interval(start, end);
        assert_eq!(normalized, Utc.with_ymd_and_hms(2024, 3, 2, 7, 0, 0).unwrap());
        assert!(normalized > start);
    }

    #[test]
    fn test_normalize_equal_times() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 22, 30, 0).unwrap();

        let normalized = normalize_interval(start, start);
        assert_eq!(normalized - start, Duration::days(1));
    }

    #[test]
    fn test_quality_bounds() {
        assert!(validate_quality(1).is_ok());
        assert!(validate_quality(5).is_ok());
        assert!(validate_quality(0).is_err());
        assert!(validate_quality(6).is_err());
    }

    #[test]
    fn test_duration_hours() {
        let record = SleepRecord {
            id: 1,
            user_id: 1,
            sleep_start: Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap(),
            sleep_end: Utc.with_ymd_and_hms(2024, 3, 2, 6, 30, 0).unwrap(),
            sleep_quality: 4,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!((record.duration_hours() - 7.5).abs() < 1e-9);
    }
}
