// src/analysis/insight.rs
// Natural-language insight over a recent window of records, compared
// against a longer baseline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::stats::{average_duration_hours, average_quality};
use crate::records::SleepRecord;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Insight service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Produces a one-paragraph summary of recent sleep. Implementations may
/// call out to a remote service; callers fall back to the deterministic
/// generator when that fails.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn summarize(
        &self,
        recent: &[SleepRecord],
        baseline: &[SleepRecord],
    ) -> Result<String, InsightError>;
}

/// Deterministic rule table. Rules are checked in priority order and the
/// first match wins, so a severe condition is never masked by a milder one.
pub struct RuleBasedInsights;

impl RuleBasedInsights {
    pub fn generate(&self, recent: &[SleepRecord], baseline: &[SleepRecord]) -> String {
        if recent.is_empty() {
            return "No sleep data yet. Log a few nights to start seeing insights.".to_string();
        }

        let recent_duration = average_duration_hours(recent);
        let recent_quality = average_quality(recent);
        let baseline_duration = average_duration_hours(baseline);
        let baseline_quality = average_quality(baseline);

        if recent_duration < 6.0 && recent_quality < 3.0 {
            return format!(
                "You're averaging {:.1} hours of sleep with a quality of {:.1}/5. \
                 Both are low. Try moving your bedtime earlier and keeping it consistent.",
                recent_duration, recent_quality
            );
        }

        if (7.5..=9.0).contains(&recent_duration) && recent_quality >= 4.0 {
            return format!(
                "Excellent sleep lately: {:.1} hours on average with a quality of {:.1}/5. \
                 Keep your current routine going.",
                recent_duration, recent_quality
            );
        }

        if !baseline.is_empty() && baseline_duration - recent_duration > 1.0 {
            return format!(
                "Your sleep duration has dropped to {:.1} hours, more than an hour below \
                 your usual {:.1}. Watch for late nights stacking up.",
                recent_duration, baseline_duration
            );
        }

        if !baseline.is_empty() && baseline_quality - recent_quality > 1.0 {
            return format!(
                "Your sleep quality has slipped to {:.1}/5 from a usual {:.1}. \
                 Consider what changed in your evenings recently.",
                recent_quality, baseline_quality
            );
        }

        format!(
            "You're averaging {:.1} hours of sleep with a quality of {:.1}/5. \
             Steady overall. Small consistency improvements tend to pay off first.",
            recent_duration, recent_quality
        )
    }
}

#[async_trait]
impl InsightGenerator for RuleBasedInsights {
    async fn summarize(
        &self,
        recent: &[SleepRecord],
        baseline: &[SleepRecord],
    ) -> Result<String, InsightError> {
        Ok(self.generate(recent, baseline))
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Remote generator posting one prompt to an OpenAI-compatible chat
/// endpoint. Only constructed when an API key is configured.
pub struct RemoteInsights {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl RemoteInsights {
    pub fn new(api_key: String, api_url: String, model: String, timeout_secs: u64) -> Result<Self, InsightError> {
        if api_key.is_empty() {
            return Err(InsightError::ServiceUnavailable(
                "API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InsightError::ServiceUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            api_url,
            model,
        })
    }

    fn build_prompt(recent: &[SleepRecord], baseline: &[SleepRecord]) -> String {
        format!(
            "Over the last {} nights the user averaged {:.1} hours of sleep with an \
             average quality of {:.1}/5. Their longer-term baseline over {} nights is \
             {:.1} hours and {:.1}/5. Write one short, friendly paragraph of feedback \
             on their sleep with one concrete suggestion.",
            recent.len(),
            average_duration_hours(recent),
            average_quality(recent),
            baseline.len(),
            average_duration_hours(baseline),
            average_quality(baseline),
        )
    }
}

#[async_trait]
impl InsightGenerator for RemoteInsights {
    async fn summarize(
        &self,
        recent: &[SleepRecord],
        baseline: &[SleepRecord],
    ) -> Result<String, InsightError> {
        if recent.is_empty() {
            // Nothing worth a remote round-trip.
            return Ok(RuleBasedInsights.generate(recent, baseline));
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: Self::build_prompt(recent, baseline),
            }],
            max_tokens: 200,
        };

        debug!("Requesting remote sleep insight from {}", self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Insight API returned {}: {}", status, body);
            return Err(InsightError::ServiceUnavailable(format!(
                "API returned {}",
                status
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InsightError::ServiceUnavailable(e.to_string()))?;

        body.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| InsightError::ServiceUnavailable("Empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    fn record(day: i64, hours: f64, quality: i64) -> SleepRecord {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap() + ChronoDuration::days(day);
        SleepRecord {
            id: day,
            user_id: 1,
            sleep_start: start,
            sleep_end: start + ChronoDuration::minutes((hours * 60.0) as i64),
            sleep_quality: quality,
            notes: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_empty_set_is_not_an_error() {
        let message = RuleBasedInsights.generate(&[], &[]);
        assert!(message.contains("No sleep data yet"));
    }

    #[test]
    fn test_short_poor_sleep_takes_priority() {
        // 5.5h average at quality 2 matches the insufficient-sleep rule even
        // though it is also more than an hour below the baseline.
        let recent = vec![record(0, 5.5, 2), record(1, 5.5, 2), record(2, 5.5, 2)];
        let baseline: Vec<SleepRecord> = (0..10).map(|i| record(i, 8.0, 4)).collect();

        let message = RuleBasedInsights.generate(&recent, &baseline);
        assert!(message.contains("Both are low"), "got: {message}");
    }

    #[test]
    fn test_excellent_sleep() {
        let recent = vec![record(0, 8.0, 4), record(1, 8.0, 5)];
        let message = RuleBasedInsights.generate(&recent, &recent);
        assert!(message.contains("Excellent sleep"), "got: {message}");
    }

    #[test]
    fn test_duration_decline_against_baseline() {
        let recent = vec![record(0, 6.5, 4), record(1, 6.5, 4)];
        let baseline: Vec<SleepRecord> = (0..10).map(|i| record(i, 8.0, 4)).collect();

        let message = RuleBasedInsights.generate(&recent, &baseline);
        assert!(message.contains("dropped"), "got: {message}");
    }

    #[test]
    fn test_quality_decline_against_baseline() {
        let recent = vec![record(0, 7.0, 2), record(1, 7.0, 4)];
        let baseline: Vec<SleepRecord> = (0..10).map(|i| record(i, 7.0, 5)).collect();

        let message = RuleBasedInsights.generate(&recent, &baseline);
        assert!(message.contains("slipped"), "got: {message}");
    }

    #[test]
    fn test_neutral_default() {
        let recent = vec![record(0, 7.0, 3)];
        let message = RuleBasedInsights.generate(&recent, &recent);
        assert!(message.contains("Steady overall"), "got: {message}");
    }

    #[test]
    fn test_remote_requires_key() {
        let remote = RemoteInsights::new(
            String::new(),
            "https://api.openai.com/v1/chat/completions".to_string(),
            "gpt-4o-mini".to_string(),
            10,
        );
        assert!(remote.is_err());
    }
}
