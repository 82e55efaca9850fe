// src/environment/store.rs

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{EnvironmentReading, NewEnvironmentReading};

pub struct EnvironmentStore {
    pool: SqlitePool,
}

impl EnvironmentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i64, data: NewEnvironmentReading) -> Result<EnvironmentReading> {
        let now = Utc::now();
        let recorded_at = data.recorded_at.unwrap_or(now);

        let result = sqlx::query(
            r#"
            INSERT INTO sleep_environment (user_id, temperature, humidity, noise_level, light_level, recorded_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(data.temperature)
        .bind(data.humidity)
        .bind(data.noise_level)
        .bind(data.light_level)
        .bind(recorded_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(EnvironmentReading {
            id: result.last_insert_rowid(),
            user_id,
            temperature: data.temperature,
            humidity: data.humidity,
            noise_level: data.noise_level,
            light_level: data.light_level,
            recorded_at,
            created_at: now,
        })
    }

    /// The most recent `limit` readings for a user, newest first.
    pub async fn recent(&self, user_id: i64, limit: i64) -> Result<Vec<EnvironmentReading>> {
        let readings = sqlx::query_as::<_, EnvironmentReading>(
            r#"
            SELECT id, user_id, temperature, humidity, noise_level, light_level, recorded_at, created_at
            FROM sleep_environment
            WHERE user_id = ?
            ORDER BY recorded_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }
}
