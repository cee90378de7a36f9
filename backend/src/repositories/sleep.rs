//! Sleep log storage

use super::ListFilter;
use anyhow::Result;
use chrono::{DateTime, Utc};
use fittrack_shared::{SleepEntry, SleepQuality, SleepRecord, TimeWindow};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SleepRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sleep_start: DateTime<Utc>,
    pub sleep_end: DateTime<Utc>,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub quality: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SleepRow> for SleepRecord {
    /// An unrecognised stored quality reads back as `Good`
    fn from(row: SleepRow) -> Self {
        let quality = row.quality.parse().unwrap_or_else(|_| {
            warn!(sleep_id = %row.id, quality = %row.quality, "Unknown stored sleep quality, using good");
            SleepQuality::Good
        });

        SleepRecord {
            id: row.id,
            user_id: row.user_id,
            sleep_start: row.sleep_start,
            sleep_end: row.sleep_end,
            date: row.date,
            duration_minutes: row.duration_minutes,
            quality,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct SleepRepository;

impl SleepRepository {
    pub async fn create(pool: &PgPool, user_id: Uuid, entry: &SleepEntry) -> Result<SleepRecord> {
        let row = sqlx::query_as::<_, SleepRow>(
            r#"
            INSERT INTO sleep_logs (user_id, sleep_start, sleep_end, date, duration_minutes, quality, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, sleep_start, sleep_end, date, duration_minutes,
                      quality, notes, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(entry.sleep_start())
        .bind(entry.sleep_end())
        .bind(entry.date())
        .bind(entry.duration_minutes())
        .bind(entry.quality().as_str())
        .bind(entry.notes())
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    pub async fn find_by_id(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<SleepRecord>> {
        let row = sqlx::query_as::<_, SleepRow>(
            r#"
            SELECT id, user_id, sleep_start, sleep_end, date, duration_minutes,
                   quality, notes, created_at, updated_at
            FROM sleep_logs
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(SleepRecord::from))
    }

    pub async fn update(pool: &PgPool, user_id: Uuid, id: Uuid, entry: &SleepEntry) -> Result<Option<SleepRecord>> {
        let row = sqlx::query_as::<_, SleepRow>(
            r#"
            UPDATE sleep_logs SET
                sleep_start = $3,
                sleep_end = $4,
                date = $5,
                duration_minutes = $6,
                quality = $7,
                notes = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, sleep_start, sleep_end, date, duration_minutes,
                      quality, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(entry.sleep_start())
        .bind(entry.sleep_end())
        .bind(entry.date())
        .bind(entry.duration_minutes())
        .bind(entry.quality().as_str())
        .bind(entry.notes())
        .fetch_optional(pool)
        .await?;

        Ok(row.map(SleepRecord::from))
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sleep_logs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(pool: &PgPool, user_id: Uuid, filter: &ListFilter) -> Result<(Vec<SleepRecord>, i64)> {
        let rows = sqlx::query_as::<_, SleepRow>(
            r#"
            SELECT id, user_id, sleep_start, sleep_end, date, duration_minutes,
                   quality, notes, created_at, updated_at
            FROM sleep_logs
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
              AND ($4::text IS NULL OR quality = $4)
            ORDER BY date DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(user_id)
        .bind(filter.start)
        .bind(filter.end)
        .bind(filter.category.as_deref())
        .bind(filter.page.limit)
        .bind(filter.page.offset)
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM sleep_logs
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
              AND ($4::text IS NULL OR quality = $4)
            "#,
        )
        .bind(user_id)
        .bind(filter.start)
        .bind(filter.end)
        .bind(filter.category.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((rows.into_iter().map(SleepRecord::from).collect(), total))
    }

    pub async fn find_in_range(pool: &PgPool, user_id: Uuid, window: &TimeWindow) -> Result<Vec<SleepRecord>> {
        let rows = sqlx::query_as::<_, SleepRow>(
            r#"
            SELECT id, user_id, sleep_start, sleep_end, date, duration_minutes,
                   quality, notes, created_at, updated_at
            FROM sleep_logs
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(SleepRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_quality_reads_as_good() {
        let row = SleepRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            sleep_start: Utc::now(),
            sleep_end: Utc::now(),
            date: Utc::now(),
            duration_minutes: 420,
            quality: "restless".to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let record = SleepRecord::from(row);
        assert_eq!(record.quality, SleepQuality::Good);
        assert_eq!(record.quality_score(), 75);
    }
}
