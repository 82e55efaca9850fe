// src/records/store.rs

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{normalize_interval, validate_quality, ListOptions, NewSleepRecord, SleepRecord, UpdateSleepRecord};

const DEFAULT_LIMIT: i64 = 100;

pub struct SleepRecordStore {
    pool: SqlitePool,
}

impl SleepRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List records for a user, newest first, with optional date range.
    pub async fn list(&self, user_id: i64, opts: &ListOptions) -> Result<Vec<SleepRecord>> {
        let records = sqlx::query_as::<_, SleepRecord>(
            r#"
            SELECT id, user_id, sleep_start, sleep_end, sleep_quality, notes, created_at, updated_at
            FROM sleep_records
            WHERE user_id = ?
              AND (? IS NULL OR sleep_start >= ?)
              AND (? IS NULL OR sleep_start <= ?)
            ORDER BY sleep_start DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(opts.start_date)
        .bind(opts.start_date)
        .bind(opts.end_date)
        .bind(opts.end_date)
        .bind(opts.limit.unwrap_or(DEFAULT_LIMIT))
        .bind(opts.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// The most recent `limit` records, newest first.
    pub async fn recent(&self, user_id: i64, limit: i64) -> Result<Vec<SleepRecord>> {
        let records = sqlx::query_as::<_, SleepRecord>(
            r#"
            SELECT id, user_id, sleep_start, sleep_end, sleep_quality, notes, created_at, updated_at
            FROM sleep_records
            WHERE user_id = ?
            ORDER BY sleep_start DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Option<SleepRecord>> {
        let record = sqlx::query_as::<_, SleepRecord>(
            r#"
            SELECT id, user_id, sleep_start, sleep_end, sleep_quality, notes, created_at, updated_at
            FROM sleep_records
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn create(&self, user_id: i64, data: NewSleepRecord) -> Result<SleepRecord> {
        validate_quality(data.sleep_quality)?;
        let sleep_end = normalize_interval(data.sleep_start, data.sleep_end);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO sleep_records (user_id, sleep_start, sleep_end, sleep_quality, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(data.sleep_start)
        .bind(sleep_end)
        .bind(data.sleep_quality)
        .bind(&data.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(SleepRecord {
            id: result.last_insert_rowid(),
            user_id,
            sleep_start: data.sleep_start,
            sleep_end,
            sleep_quality: data.sleep_quality,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn update(&self, id: i64, data: UpdateSleepRecord) -> Result<Option<SleepRecord>> {
        let existing = match self.get(id).await? {
            Some(record) => record,
            None => return Ok(None),
        };

        let sleep_start = data.sleep_start.unwrap_or(existing.sleep_start);
        let sleep_end = normalize_interval(sleep_start, data.sleep_end.unwrap_or(existing.sleep_end));
        let sleep_quality = data.sleep_quality.unwrap_or(existing.sleep_quality);
        validate_quality(sleep_quality)?;
        let notes = data.notes.or(existing.notes);
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE sleep_records
            SET sleep_start = ?, sleep_end = ?, sleep_quality = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(sleep_start)
        .bind(sleep_end)
        .bind(sleep_quality)
        .bind(&notes)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sleep_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
