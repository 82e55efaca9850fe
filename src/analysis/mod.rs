// src/analysis/mod.rs
// Statistics, patterns, environment correlation, and insight generation.

pub mod insight;
pub mod service;
pub mod stats;

pub use insight::{InsightError, InsightGenerator, RemoteInsights, RuleBasedInsights};
pub use service::{AnalysisReport, AnalysisService, Improvement, Recommendations};
pub use stats::{
    compute_stats, consistency_score, environment_impact, pearson, EnvironmentImpact, Impact,
    MonthlyPattern, SleepStats, WeekdayPattern,
};
