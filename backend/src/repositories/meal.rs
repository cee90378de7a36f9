//! Meal storage; foods live in a JSONB column next to their derived totals

use super::{decimal_to_f64, to_decimal, ListFilter};
use anyhow::Result;
use chrono::{DateTime, Utc};
use fittrack_shared::{FoodItem, MealEntry, MealRecord, MealTotals, TimeWindow};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: String,
    pub date: DateTime<Utc>,
    pub foods: Json<Vec<FoodItem>>,
    pub total_calories: Decimal,
    pub total_protein: Decimal,
    pub total_carbs: Decimal,
    pub total_fat: Decimal,
    pub total_fiber: Decimal,
    pub total_sugar: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MealRow> for MealRecord {
    type Error = anyhow::Error;

    fn try_from(row: MealRow) -> Result<Self> {
        Ok(MealRecord {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            meal_type: row.meal_type.parse()?,
            date: row.date,
            foods: row.foods.0,
            totals: MealTotals {
                total_calories: decimal_to_f64(row.total_calories),
                total_protein: decimal_to_f64(row.total_protein),
                total_carbs: decimal_to_f64(row.total_carbs),
                total_fat: decimal_to_f64(row.total_fat),
                total_fiber: decimal_to_f64(row.total_fiber),
                total_sugar: decimal_to_f64(row.total_sugar),
            },
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_records(rows: Vec<MealRow>) -> Result<Vec<MealRecord>> {
    rows.into_iter().map(MealRecord::try_from).collect()
}

pub struct MealRepository;

impl MealRepository {
    pub async fn create(pool: &PgPool, user_id: Uuid, entry: &MealEntry) -> Result<MealRecord> {
        let totals = entry.totals();
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            INSERT INTO meals (
                user_id, name, meal_type, date, foods,
                total_calories, total_protein, total_carbs, total_fat, total_fiber, total_sugar,
                notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, user_id, name, meal_type, date, foods,
                      total_calories, total_protein, total_carbs, total_fat, total_fiber, total_sugar,
                      notes, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(entry.name())
        .bind(entry.meal_type().as_str())
        .bind(entry.date())
        .bind(Json(entry.foods()))
        .bind(to_decimal(totals.total_calories)?)
        .bind(to_decimal(totals.total_protein)?)
        .bind(to_decimal(totals.total_carbs)?)
        .bind(to_decimal(totals.total_fat)?)
        .bind(to_decimal(totals.total_fiber)?)
        .bind(to_decimal(totals.total_sugar)?)
        .bind(entry.notes())
        .fetch_one(pool)
        .await?;

        row.try_into()
    }

    pub async fn find_by_id(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<MealRecord>> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, user_id, name, meal_type, date, foods,
                   total_calories, total_protein, total_carbs, total_fat, total_fiber, total_sugar,
                   notes, created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        row.map(MealRecord::try_from).transpose()
    }

    pub async fn update(pool: &PgPool, user_id: Uuid, id: Uuid, entry: &MealEntry) -> Result<Option<MealRecord>> {
        let totals = entry.totals();
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            UPDATE meals SET
                name = $3,
                meal_type = $4,
                date = $5,
                foods = $6,
                total_calories = $7,
                total_protein = $8,
                total_carbs = $9,
                total_fat = $10,
                total_fiber = $11,
                total_sugar = $12,
                notes = $13,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, meal_type, date, foods,
                      total_calories, total_protein, total_carbs, total_fat, total_fiber, total_sugar,
                      notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(entry.name())
        .bind(entry.meal_type().as_str())
        .bind(entry.date())
        .bind(Json(entry.foods()))
        .bind(to_decimal(totals.total_calories)?)
        .bind(to_decimal(totals.total_protein)?)
        .bind(to_decimal(totals.total_carbs)?)
        .bind(to_decimal(totals.total_fat)?)
        .bind(to_decimal(totals.total_fiber)?)
        .bind(to_decimal(totals.total_sugar)?)
        .bind(entry.notes())
        .fetch_optional(pool)
        .await?;

        row.map(MealRecord::try_from).transpose()
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(pool: &PgPool, user_id: Uuid, filter: &ListFilter) -> Result<(Vec<MealRecord>, i64)> {
        let rows = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, user_id, name, meal_type, date, foods,
                   total_calories, total_protein, total_carbs, total_fat, total_fiber, total_sugar,
                   notes, created_at, updated_at
            FROM meals
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
              AND ($4::text IS NULL OR meal_type = $4)
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
            FROM meals
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
              AND ($4::text IS NULL OR meal_type = $4)
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

    pub async fn find_in_range(pool: &PgPool, user_id: Uuid, window: &TimeWindow) -> Result<Vec<MealRecord>> {
        let rows = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, user_id, name, meal_type, date, foods,
                   total_calories, total_protein, total_carbs, total_fat, total_fiber, total_sugar,
                   notes, created_at, updated_at
            FROM meals
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
