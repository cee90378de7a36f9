//! Workout storage

use super::ListFilter;
use anyhow::Result;
use chrono::{DateTime, Utc};
use fittrack_shared::{TimeWindow, WorkoutEntry, WorkoutRecord};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_type: String,
    pub intensity: String,
    pub duration_minutes: i32,
    pub date: DateTime<Utc>,
    pub calories_burned: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<WorkoutRow> for WorkoutRecord {
    type Error = anyhow::Error;

    fn try_from(row: WorkoutRow) -> Result<Self> {
        Ok(WorkoutRecord {
            id: row.id,
            user_id: row.user_id,
            exercise_type: row.exercise_type.parse()?,
            intensity: row.intensity,
            duration_minutes: row.duration_minutes,
            date: row.date,
            calories_burned: row.calories_burned,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_records(rows: Vec<WorkoutRow>) -> Result<Vec<WorkoutRecord>> {
    rows.into_iter().map(WorkoutRecord::try_from).collect()
}

pub struct WorkoutRepository;

impl WorkoutRepository {
    pub async fn create(pool: &PgPool, user_id: Uuid, entry: &WorkoutEntry) -> Result<WorkoutRecord> {
        let row = sqlx::query_as::<_, WorkoutRow>(
            r#"
            INSERT INTO workouts (
                user_id, exercise_type, intensity, duration_minutes, date, calories_burned, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, exercise_type, intensity, duration_minutes, date,
                      calories_burned, notes, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(entry.exercise_type().as_str())
        .bind(entry.intensity())
        .bind(entry.duration_minutes())
        .bind(entry.date())
        .bind(entry.calories_burned())
        .bind(entry.notes())
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    pub async fn find_by_id(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<WorkoutRecord>> {
        let row = sqlx::query_as::<_, WorkoutRow>(
            r#"
            SELECT id, user_id, exercise_type, intensity, duration_minutes, date,
                   calories_burned, notes, created_at, updated_at
            FROM workouts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        row.map(WorkoutRecord::try_from).transpose()
    }

    /// Overwrite every stored field with `entry`; `None` when the workout is not the user's
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        entry: &WorkoutEntry,
    ) -> Result<Option<WorkoutRecord>> {
        let row = sqlx::query_as::<_, WorkoutRow>(
            r#"
            UPDATE workouts SET
                exercise_type = $3,
                intensity = $4,
                duration_minutes = $5,
                date = $6,
                calories_burned = $7,
                notes = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, exercise_type, intensity, duration_minutes, date,
                      calories_burned, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(entry.exercise_type().as_str())
        .bind(entry.intensity())
        .bind(entry.duration_minutes())
        .bind(entry.date())
        .bind(entry.calories_burned())
        .bind(entry.notes())
        .fetch_optional(pool)
        .await?;

        row.map(WorkoutRecord::try_from).transpose()
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Newest first, with the total matching count
    pub async fn list(pool: &PgPool, user_id: Uuid, filter: &ListFilter) -> Result<(Vec<WorkoutRecord>, i64)> {
        let rows = sqlx::query_as::<_, WorkoutRow>(
            r#"
            SELECT id, user_id, exercise_type, intensity, duration_minutes, date,
                   calories_burned, notes, created_at, updated_at
            FROM workouts
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
              AND ($4::text IS NULL OR exercise_type = $4)
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
            FROM workouts
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
              AND ($4::text IS NULL OR exercise_type = $4)
            "#,
        )
        .bind(user_id)
        .bind(filter.start)
        .bind(filter.end)
        .bind(filter.category.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((into_records(rows)?, total))
    }

    /// Every workout dated inside the inclusive window, oldest first
    pub async fn find_in_range(pool: &PgPool, user_id: Uuid, window: &TimeWindow) -> Result<Vec<WorkoutRecord>> {
        let rows = sqlx::query_as::<_, WorkoutRow>(
            r#"
            SELECT id, user_id, exercise_type, intensity, duration_minutes, date,
                   calories_burned, notes, created_at, updated_at
            FROM workouts
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await?;

        into_records(rows)
    }
}
