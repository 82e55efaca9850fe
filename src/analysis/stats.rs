// src/analysis/stats.rs
// Pure aggregation over in-memory record sets. Deterministic, no side
// effects, and total: every function has a defined output for an empty
// input rather than an error.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::environment::{EnvironmentReading, FACTORS};
use crate::records::SleepRecord;

/// Aggregate statistics derived from a user's records. Never persisted;
/// recomputed on each request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepStats {
    pub average_sleep_duration: f64,
    pub average_sleep_quality: f64,
    pub consistency_score: f64,
    pub total_records: usize,
    pub weekly_pattern: Vec<WeekdayPattern>,
    pub monthly_pattern: Vec<MonthlyPattern>,
}

/// Averages for one weekday across the analyzed set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayPattern {
    pub day: String,
    pub avg_sleep_hours: f64,
    pub avg_sleep_quality: f64,
    pub consistency: f64,
}

/// Averages for one 7-day window of the current calendar month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPattern {
    pub week: u32,
    pub avg_sleep_hours: f64,
    pub avg_sleep_quality: f64,
    pub consistency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

/// Pearson correlation between one environment factor and sleep quality.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentImpact {
    pub factor: String,
    pub correlation: f64,
    pub impact: Impact,
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn compute_stats(records: &[SleepRecord], now: DateTime<Utc>) -> SleepStats {
    SleepStats {
        average_sleep_duration: average_duration_hours(records),
        average_sleep_quality: average_quality(records),
        consistency_score: consistency_score(records),
        total_records: records.len(),
        weekly_pattern: weekly_pattern(records),
        monthly_pattern: monthly_pattern(records, now),
    }
}

/// Mean sleep duration in fractional hours. Empty set yields 0.0.
pub fn average_duration_hours(records: &[SleepRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(|r| r.duration_hours()).sum();
    total / records.len() as f64
}

/// Mean quality rating. Empty set yields 0.0.
pub fn average_quality(records: &[SleepRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(|r| r.sleep_quality as f64).sum();
    total / records.len() as f64
}

/// Bedtime regularity on a 0..100 scale. The score maps the population
/// standard deviation of bedtime clock-times (minutes since midnight) so
/// that identical bedtimes score 100 and a spread of an hour or more
/// scores 0. A heuristic, not a rigorous circadian measure.
pub fn consistency_score(records: &[SleepRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let minutes: Vec<f64> = records.iter().map(|r| bedtime_minutes(r)).collect();
    let mean = minutes.iter().sum::<f64>() / minutes.len() as f64;
    let variance = minutes.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / minutes.len() as f64;
    100.0 - (variance.sqrt() / 60.0 * 100.0).min(100.0)
}

fn bedtime_minutes(record: &SleepRecord) -> f64 {
    let t = record.sleep_start.time();
    t.hour() as f64 * 60.0 + t.minute() as f64
}

/// Per-weekday averages, Monday through Sunday, skipping weekdays with no
/// records.
pub fn weekly_pattern(records: &[SleepRecord]) -> Vec<WeekdayPattern> {
    WEEKDAYS
        .iter()
        .filter_map(|&day| {
            let bucket: Vec<SleepRecord> = records
                .iter()
                .filter(|r| r.sleep_start.weekday() == day)
                .cloned()
                .collect();
            if bucket.is_empty() {
                return None;
            }
            Some(WeekdayPattern {
                day: weekday_name(day).to_string(),
                avg_sleep_hours: average_duration_hours(&bucket),
                avg_sleep_quality: average_quality(&bucket),
                consistency: consistency_score(&bucket),
            })
        })
        .collect()
}

/// Averages over 7-day windows of the current calendar month, counted from
/// the 1st. Only non-empty windows are emitted.
pub fn monthly_pattern(records: &[SleepRecord], now: DateTime<Utc>) -> Vec<MonthlyPattern> {
    let this_month: Vec<&SleepRecord> = records
        .iter()
        .filter(|r| r.sleep_start.year() == now.year() && r.sleep_start.month() == now.month())
        .collect();

    (1..=5u32)
        .filter_map(|week| {
            let bucket: Vec<SleepRecord> = this_month
                .iter()
                .filter(|r| (r.sleep_start.day() - 1) / 7 + 1 == week)
                .map(|r| (*r).clone())
                .collect();
            if bucket.is_empty() {
                return None;
            }
            Some(MonthlyPattern {
                week,
                avg_sleep_hours: average_duration_hours(&bucket),
                avg_sleep_quality: average_quality(&bucket),
                consistency: consistency_score(&bucket),
            })
        })
        .collect()
}

/// Pearson correlation coefficient over paired samples. The series are
/// truncated to the shorter length; zero variance in either series yields
/// 0 rather than NaN.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];
    let nf = n as f64;

    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Correlate each environment factor against sleep quality, pairing the
/// i-th reading with the i-th record (both newest first) and truncating
/// to the shorter series. Missing factor values count as 0.0.
pub fn environment_impact(
    records: &[SleepRecord],
    readings: &[EnvironmentReading],
) -> Vec<EnvironmentImpact> {
    let quality: Vec<f64> = records.iter().map(|r| r.sleep_quality as f64).collect();

    FACTORS
        .iter()
        .map(|&factor| {
            let values: Vec<f64> = readings.iter().map(|e| e.factor(factor)).collect();
            let correlation = pearson(&values, &quality);
            EnvironmentImpact {
                factor: factor.to_string(),
                correlation,
                impact: classify_impact(correlation),
            }
        })
        .collect()
}

fn classify_impact(correlation: f64) -> Impact {
    if correlation > 0.3 {
        Impact::Positive
    } else if correlation < -0.3 {
        Impact::Negative
    } else {
        Impact::Neutral
    }
}

/// Mean clock-time of the given instants, formatted "HH:MM". Empty input
/// yields None.
pub fn mean_clock_time(instants: &[DateTime<Utc>]) -> Option<String> {
    if instants.is_empty() {
        return None;
    }
    let total: f64 = instants
        .iter()
        .map(|t| t.time().hour() as f64 * 60.0 + t.time().minute() as f64)
        .sum();
    let mean = (total / instants.len() as f64).round() as u32 % (24 * 60);
    Some(format!("{:02}:{:02}", mean / 60, mean % 60))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(start: DateTime<Utc>, hours: f64, quality: i64) -> SleepRecord {
        SleepRecord {
            id: 0,
            user_id: 1,
            sleep_start: start,
            sleep_end: start + Duration::minutes((hours * 60.0) as i64),
            sleep_quality: quality,
            notes: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_averages_match_arithmetic_mean() {
        let base = Utc.with_ymd_and_hms(2024, 3, 4, 23, 0, 0).unwrap();
        let records = vec![
            record(base, 7.0, 4),
            record(base + Duration::days(1), 8.0, 5),
            record(base + Duration::days(2), 6.5, 3),
        ];

        let avg = average_duration_hours(&records);
        assert!((avg - 7.166666).abs() < 1e-4);
        assert!((average_quality(&records) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_set_yields_zeros() {
        let stats = compute_stats(&[], Utc::now());
        assert_eq!(stats.average_sleep_duration, 0.0);
        assert_eq!(stats.average_sleep_quality, 0.0);
        assert_eq!(stats.consistency_score, 0.0);
        assert_eq!(stats.total_records, 0);
        assert!(stats.weekly_pattern.is_empty());
        assert!(stats.monthly_pattern.is_empty());
    }

    #[test]
    fn test_identical_bedtimes_score_100() {
        let records: Vec<SleepRecord> = (0..5)
            .map(|i| {
                record(
                    Utc.with_ymd_and_hms(2024, 3, 4 + i, 23, 0, 0).unwrap(),
                    7.5,
                    4,
                )
            })
            .collect();

        assert!((consistency_score(&records) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_shift_invariance() {
        // Shifting every bedtime by the same offset leaves the score alone.
        let base: Vec<SleepRecord> = (0..4)
            .map(|i| {
                record(
                    Utc.with_ymd_and_hms(2024, 3, 4 + i, 22, 10 * i, 0).unwrap(),
                    7.0,
                    3,
                )
            })
            .collect();
        let shifted: Vec<SleepRecord> = base
            .iter()
            .map(|r| record(r.sleep_start + Duration::minutes(45), 7.0, 3))
            .collect();

        let a = consistency_score(&base);
        let b = consistency_score(&shifted);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_wide_bedtime_spread_scores_zero() {
        // Stddev of 120 minutes clamps to a score of 0.
        let records = vec![
            record(Utc.with_ymd_and_hms(2024, 3, 4, 20, 0, 0).unwrap(), 7.0, 3),
            record(Utc.with_ymd_and_hms(2024, 3, 6, 0, 0, 0).unwrap(), 7.0, 3),
        ];

        assert!(consistency_score(&records).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_pattern_buckets_by_weekday() {
        // 2024-03-04 is a Monday.
        let records = vec![
            record(Utc.with_ymd_and_hms(2024, 3, 4, 23, 0, 0).unwrap(), 7.0, 4),
            record(Utc.with_ymd_and_hms(2024, 3, 11, 23, 0, 0).unwrap(), 9.0, 2),
            record(Utc.with_ymd_and_hms(2024, 3, 5, 22, 0, 0).unwrap(), 6.0, 5),
        ];

        let pattern = weekly_pattern(&records);
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern[0].day, "Monday");
        assert!((pattern[0].avg_sleep_hours - 8.0).abs() < 1e-9);
        assert!((pattern[0].avg_sleep_quality - 3.0).abs() < 1e-9);
        assert_eq!(pattern[1].day, "Tuesday");
        assert!((pattern[1].consistency - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_pattern_windows_from_first() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let records = vec![
            record(Utc.with_ymd_and_hms(2024, 3, 2, 23, 0, 0).unwrap(), 7.0, 4),
            record(Utc.with_ymd_and_hms(2024, 3, 7, 23, 0, 0).unwrap(), 8.0, 4),
            record(Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap(), 6.0, 2),
            // Previous month, excluded.
            record(Utc.with_ymd_and_hms(2024, 2, 9, 23, 0, 0).unwrap(), 4.0, 1),
        ];

        let pattern = monthly_pattern(&records, now);
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern[0].week, 1);
        assert!((pattern[0].avg_sleep_hours - 7.5).abs() < 1e-9);
        assert_eq!(pattern[1].week, 2);
        assert!((pattern[1].avg_sleep_hours - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_symmetry() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 1.0, 4.0, 3.0];

        let a = pearson(&xs, &ys);
        let b = pearson(&ys, &xs);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [10.0, 20.0, 30.0];

        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
        let neg = [30.0, 20.0, 10.0];
        assert!((pearson(&xs, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_series_is_zero() {
        let xs = [5.0, 5.0, 5.0];
        let ys = [1.0, 2.0, 3.0];

        let r = pearson(&xs, &ys);
        assert_eq!(r, 0.0);
        assert!(!r.is_nan());
    }

    #[test]
    fn test_pearson_truncates_to_shorter_series() {
        let xs = [1.0, 2.0, 3.0, 100.0];
        let ys = [10.0, 20.0, 30.0];

        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_environment_impact_classification() {
        let base = Utc.with_ymd_and_hms(2024, 3, 4, 23, 0, 0).unwrap();
        let records = vec![
            record(base, 7.0, 1),
            record(base + Duration::days(1), 7.0, 3),
            record(base + Duration::days(2), 7.0, 5),
        ];
        let readings: Vec<EnvironmentReading> = [18.0, 20.0, 22.0]
            .iter()
            .enumerate()
            .map(|(i, &temp)| EnvironmentReading {
                id: i as i64,
                user_id: 1,
                temperature: Some(temp),
                humidity: None,
                noise_level: Some(40.0),
                light_level: None,
                recorded_at: base + Duration::days(i as i64),
                created_at: base,
            })
            .collect();

        let impacts = environment_impact(&records, &readings);
        assert_eq!(impacts.len(), 4);

        let temp = impacts.iter().find(|i| i.factor == "temperature").unwrap();
        assert_eq!(temp.impact, Impact::Positive);
        assert!((temp.correlation - 1.0).abs() < 1e-12);

        // Missing humidity readings all coerce to 0.0, a constant series.
        let humidity = impacts.iter().find(|i| i.factor == "humidity").unwrap();
        assert_eq!(humidity.correlation, 0.0);
        assert_eq!(humidity.impact, Impact::Neutral);
    }

    #[test]
    fn test_mean_clock_time() {
        let instants = vec![
            Utc.with_ymd_and_hms(2024, 3, 4, 22, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 23, 30, 0).unwrap(),
        ];

        assert_eq!(mean_clock_time(&instants).as_deref(), Some("23:00"));
        assert_eq!(mean_clock_time(&[]), None);
    }
}
