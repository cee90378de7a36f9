//! Body progress storage

use super::{decimal_to_f64, to_decimal, to_decimal_opt, ListFilter};
use anyhow::Result;
use chrono::{DateTime, Utc};
use fittrack_shared::{Measurements, ProgressEntry, ProgressRecord, TimeWindow};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub weight_kg: Decimal,
    pub body_fat_percent: Option<Decimal>,
    pub muscle_mass_kg: Option<Decimal>,
    pub measurements: Json<Measurements>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProgressRow> for ProgressRecord {
    fn from(row: ProgressRow) -> Self {
        ProgressRecord {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            weight_kg: decimal_to_f64(row.weight_kg),
            body_fat_percent: row.body_fat_percent.map(decimal_to_f64),
            muscle_mass_kg: row.muscle_mass_kg.map(decimal_to_f64),
            measurements: row.measurements.0,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct ProgressRepository;

impl ProgressRepository {
    pub async fn create(pool: &PgPool, user_id: Uuid, entry: &ProgressEntry) -> Result<ProgressRecord> {
        let row = sqlx::query_as::<_, ProgressRow>(
            r#"
            INSERT INTO progress_entries (
                user_id, date, weight_kg, body_fat_percent, muscle_mass_kg, measurements, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, date, weight_kg, body_fat_percent, muscle_mass_kg,
                      measurements, notes, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(entry.date())
        .bind(to_decimal(entry.weight_kg())?)
        .bind(to_decimal_opt(entry.body_fat_percent())?)
        .bind(to_decimal_opt(entry.muscle_mass_kg())?)
        .bind(Json(entry.measurements()))
        .bind(entry.notes())
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    pub async fn find_by_id(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<ProgressRecord>> {
        let row = sqlx::query_as::<_, ProgressRow>(
            r#"
            SELECT id, user_id, date, weight_kg, body_fat_percent, muscle_mass_kg,
                   measurements, notes, created_at, updated_at
            FROM progress_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(ProgressRecord::from))
    }

    /// Most recent entry by date
    pub async fn find_latest(pool: &PgPool, user_id: Uuid) -> Result<Option<ProgressRecord>> {
        let row = sqlx::query_as::<_, ProgressRow>(
            r#"
            SELECT id, user_id, date, weight_kg, body_fat_percent, muscle_mass_kg,
                   measurements, notes, created_at, updated_at
            FROM progress_entries
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(ProgressRecord::from))
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        entry: &ProgressEntry,
    ) -> Result<Option<ProgressRecord>> {
        let row = sqlx::query_as::<_, ProgressRow>(
            r#"
            UPDATE progress_entries SET
                date = $3,
                weight_kg = $4,
                body_fat_percent = $5,
                muscle_mass_kg = $6,
                measurements = $7,
                notes = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, date, weight_kg, body_fat_percent, muscle_mass_kg,
                      measurements, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(entry.date())
        .bind(to_decimal(entry.weight_kg())?)
        .bind(to_decimal_opt(entry.body_fat_percent())?)
        .bind(to_decimal_opt(entry.muscle_mass_kg())?)
        .bind(Json(entry.measurements()))
        .bind(entry.notes())
        .fetch_optional(pool)
        .await?;

        Ok(row.map(ProgressRecord::from))
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM progress_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Progress has no category; `filter.category` is ignored
    pub async fn list(pool: &PgPool, user_id: Uuid, filter: &ListFilter) -> Result<(Vec<ProgressRecord>, i64)> {
        let rows = sqlx::query_as::<_, ProgressRow>(
            r#"
            SELECT id, user_id, date, weight_kg, body_fat_percent, muscle_mass_kg,
                   measurements, notes, created_at, updated_at
            FROM progress_entries
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
            ORDER BY date DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(filter.start)
        .bind(filter.end)
        .bind(filter.page.limit)
        .bind(filter.page.offset)
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM progress_entries
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
            "#,
        )
        .bind(user_id)
        .bind(filter.start)
        .bind(filter.end)
        .fetch_one(pool)
        .await?;

        Ok((rows.into_iter().map(ProgressRecord::from).collect(), total))
    }

    pub async fn find_in_range(pool: &PgPool, user_id: Uuid, window: &TimeWindow) -> Result<Vec<ProgressRecord>> {
        let rows = sqlx::query_as::<_, ProgressRow>(
            r#"
            SELECT id, user_id, date, weight_kg, body_fat_percent, muscle_mass_kg,
                   measurements, notes, created_at, updated_at
            FROM progress_entries
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(ProgressRecord::from).collect())
    }
}
