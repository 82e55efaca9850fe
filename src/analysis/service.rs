// src/analysis/service.rs
// Orchestrates store fetch -> pure aggregation -> insight generation.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use super::insight::{InsightGenerator, RemoteInsights, RuleBasedInsights};
use super::stats::{self, EnvironmentImpact, MonthlyPattern, SleepStats, WeekdayPattern};
use crate::config::CONFIG;
use crate::environment::EnvironmentStore;
use crate::records::{SleepRecord, SleepRecordStore};

const TARGET_SLEEP_HOURS: f64 = 8.0;
const MAX_QUALITY: f64 = 5.0;

/// The full analysis payload returned by `GET /api/analysis`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub stats: SleepStats,
    pub environment: Vec<EnvironmentImpact>,
    pub recommendations: Recommendations,
    pub insight: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub recommended_bedtime: Option<String>,
    pub recommended_wakeup: Option<String>,
    pub suggestions: Vec<String>,
    pub improvement: Improvement,
}

/// Gaps to an 8-hour, quality-5 night, clamped at zero.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
    pub additional_sleep_hours: f64,
    pub quality_gap: f64,
}

pub struct AnalysisService {
    records: SleepRecordStore,
    environment: EnvironmentStore,
    rules: RuleBasedInsights,
    remote: Option<RemoteInsights>,
    recent_window: i64,
    baseline_window: i64,
}

impl AnalysisService {
    pub fn new(pool: SqlitePool) -> Self {
        let remote = CONFIG.insight.api_key.as_ref().and_then(|key| {
            match RemoteInsights::new(
                key.clone(),
                CONFIG.insight.api_url.clone(),
                CONFIG.insight.model.clone(),
                CONFIG.insight.timeout_secs,
            ) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!("Remote insight client disabled: {}", e);
                    None
                }
            }
        });

        Self {
            records: SleepRecordStore::new(pool.clone()),
            environment: EnvironmentStore::new(pool),
            rules: RuleBasedInsights,
            remote,
            recent_window: CONFIG.analysis.recent_window,
            baseline_window: CONFIG.analysis.baseline_window,
        }
    }

    /// Aggregate statistics over the baseline window.
    pub async fn stats(&self, user_id: i64) -> Result<SleepStats> {
        let records = self.records.recent(user_id, self.baseline_window).await?;
        Ok(stats::compute_stats(&records, Utc::now()))
    }

    pub async fn weekly(&self, user_id: i64) -> Result<Vec<WeekdayPattern>> {
        let records = self.records.recent(user_id, self.baseline_window).await?;
        Ok(stats::weekly_pattern(&records))
    }

    pub async fn monthly(&self, user_id: i64) -> Result<Vec<MonthlyPattern>> {
        let records = self.records.recent(user_id, self.baseline_window).await?;
        Ok(stats::monthly_pattern(&records, Utc::now()))
    }

    /// Pearson correlation of each environment factor against quality.
    pub async fn environment(&self, user_id: i64) -> Result<Vec<EnvironmentImpact>> {
        let records = self.records.recent(user_id, self.baseline_window).await?;
        let readings = self.environment.recent(user_id, self.baseline_window).await?;
        Ok(stats::environment_impact(&records, &readings))
    }

    /// Natural-language insight. Prefers the remote generator when one is
    /// configured; any remote failure degrades to the rule-based output.
    pub async fn insight(&self, user_id: i64) -> Result<String> {
        let baseline = self.records.recent(user_id, self.baseline_window).await?;
        let window = (self.recent_window as usize).min(baseline.len());
        let recent = &baseline[..window];

        if let Some(remote) = &self.remote {
            match remote.summarize(recent, &baseline).await {
                Ok(message) => return Ok(message),
                Err(e) => warn!("Remote insight failed, using rule-based fallback: {}", e),
            }
        }

        self.rules
            .summarize(recent, &baseline)
            .await
            .map_err(Into::into)
    }

    /// Full report: stats, patterns, environment impact, recommendations,
    /// and insight in one response.
    pub async fn report(&self, user_id: i64) -> Result<AnalysisReport> {
        let baseline = self.records.recent(user_id, self.baseline_window).await?;
        let readings = self.environment.recent(user_id, self.baseline_window).await?;

        let stats = stats::compute_stats(&baseline, Utc::now());
        let environment = stats::environment_impact(&baseline, &readings);
        let recommendations = Self::recommendations(&baseline, &stats);
        let insight = self.insight(user_id).await?;

        Ok(AnalysisReport {
            stats,
            environment,
            recommendations,
            insight,
        })
    }

    fn recommendations(records: &[SleepRecord], stats: &SleepStats) -> Recommendations {
        let bedtimes: Vec<_> = records.iter().map(|r| r.sleep_start).collect();
        let waketimes: Vec<_> = records.iter().map(|r| r.sleep_end).collect();

        let mut suggestions = Vec::new();
        if !records.is_empty() {
            if stats.average_sleep_duration < 7.0 {
                suggestions.push(
                    "You're sleeping less than 7 hours on average. Aim for an earlier bedtime."
                        .to_string(),
                );
            } else if stats.average_sleep_duration > 9.0 {
                suggestions.push(
                    "You're sleeping more than 9 hours on average. Oversleeping can also hurt rest quality."
                        .to_string(),
                );
            }
            if stats.average_sleep_quality < 3.0 {
                suggestions.push(
                    "Your average sleep quality is low. Review your evening routine and bedroom environment."
                        .to_string(),
                );
            }
        }

        Recommendations {
            recommended_bedtime: stats::mean_clock_time(&bedtimes),
            recommended_wakeup: stats::mean_clock_time(&waketimes),
            suggestions,
            improvement: Improvement {
                additional_sleep_hours: (TARGET_SLEEP_HOURS - stats.average_sleep_duration)
                    .max(0.0),
                quality_gap: (MAX_QUALITY - stats.average_sleep_quality).max(0.0),
            },
        }
    }
}
