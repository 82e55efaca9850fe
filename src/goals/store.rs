// src/goals/store.rs

use anyhow::{anyhow, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use super::{validate_clock_time, NewSleepGoal, SleepGoal, UpdateSleepGoal};
use crate::records::validate_quality;

pub struct SleepGoalStore {
    pool: SqlitePool,
}

impl SleepGoalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: i64) -> Result<Option<SleepGoal>> {
        let goal = sqlx::query_as::<_, SleepGoal>(
            r#"
            SELECT id, user_id, bedtime_time, wakeup_time, target_sleep_quality, created_at, updated_at
            FROM sleep_goals
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(goal)
    }

    /// Replace-on-create upsert: a user has at most one goal, so creating a
    /// new one deletes the prior row in the same transaction.
    pub async fn replace(&self, user_id: i64, data: NewSleepGoal) -> Result<SleepGoal> {
        validate_clock_time(&data.bedtime_time)?;
        validate_clock_time(&data.wakeup_time)?;
        validate_quality(data.target_sleep_quality)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sleep_goals WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO sleep_goals (user_id, bedtime_time, wakeup_time, target_sleep_quality, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&data.bedtime_time)
        .bind(&data.wakeup_time)
        .bind(data.target_sleep_quality)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SleepGoal {
            id: result.last_insert_rowid(),
            user_id,
            bedtime_time: data.bedtime_time,
            wakeup_time: data.wakeup_time,
            target_sleep_quality: data.target_sleep_quality,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn update(&self, id: i64, data: UpdateSleepGoal) -> Result<Option<SleepGoal>> {
        let existing = sqlx::query_as::<_, SleepGoal>(
            r#"
            SELECT id, user_id, bedtime_time, wakeup_time, target_sleep_quality, created_at, updated_at
            FROM sleep_goals
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let existing = match existing {
            Some(goal) => goal,
            None => return Ok(None),
        };

        let bedtime_time = data.bedtime_time.unwrap_or(existing.bedtime_time);
        let wakeup_time = data.wakeup_time.unwrap_or(existing.wakeup_time);
        let target = data.target_sleep_quality.unwrap_or(existing.target_sleep_quality);
        validate_clock_time(&bedtime_time)?;
        validate_clock_time(&wakeup_time)?;
        validate_quality(target)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE sleep_goals
            SET bedtime_time = ?, wakeup_time = ?, target_sleep_quality = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&bedtime_time)
        .bind(&wakeup_time)
        .bind(target)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(SleepGoal {
            id,
            user_id: existing.user_id,
            bedtime_time,
            wakeup_time,
            target_sleep_quality: target,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<SleepGoal> {
        sqlx::query_as::<_, SleepGoal>(
            r#"
            SELECT id, user_id, bedtime_time, wakeup_time, target_sleep_quality, created_at, updated_at
            FROM sleep_goals
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|_| anyhow!("Goal not found"))
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sleep_goals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
