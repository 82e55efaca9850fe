// src/config/mod.rs
// Central configuration for the Somnus backend

pub mod helpers;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref CONFIG: SomnusConfig = SomnusConfig::from_env();
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: helpers::env_or("SOMNUS_HOST", "127.0.0.1"),
            port: helpers::env_parsed_or("SOMNUS_PORT", 3000),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: helpers::env_or("DATABASE_URL", "sqlite://somnus.db?mode=rwc"),
            max_connections: helpers::env_parsed_or("SOMNUS_SQLITE_MAX_CONNECTIONS", 10),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: helpers::env_or("JWT_SECRET", "somnus-jwt-secret-change-in-production"),
            token_ttl_days: helpers::env_parsed_or("JWT_TTL_DAYS", 7),
        }
    }
}

/// Analysis window sizes (number of most recent records considered)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub recent_window: i64,
    pub baseline_window: i64,
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        Self {
            recent_window: helpers::env_parsed_or("ANALYSIS_RECENT_WINDOW", 7),
            baseline_window: helpers::env_parsed_or("ANALYSIS_BASELINE_WINDOW", 30),
        }
    }
}

/// Optional remote natural-language insight provider.
/// When no API key is set, the deterministic rule-based generator is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl InsightConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: helpers::env_opt("INSIGHT_API_KEY"),
            api_url: helpers::env_or(
                "INSIGHT_API_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            model: helpers::env_or("INSIGHT_MODEL", "gpt-4o-mini"),
            timeout_secs: helpers::env_parsed_or("INSIGHT_TIMEOUT_SECS", 15),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: helpers::env_or("SOMNUS_LOG_LEVEL", "info"),
        }
    }
}

/// Main configuration structure - composes all domain configs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SomnusConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub analysis: AnalysisConfig,
    pub insight: InsightConfig,
    pub logging: LoggingConfig,
}

impl SomnusConfig {
    pub fn from_env() -> Self {
        // Don't panic if .env doesn't exist (for production)
        dotenv::dotenv().ok();

        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            analysis: AnalysisConfig::from_env(),
            insight: InsightConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }

    /// Validate config on startup
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        if self.analysis.recent_window < 1 || self.analysis.baseline_window < 1 {
            anyhow::bail!("analysis window sizes must be at least 1");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}

impl Default for SomnusConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
