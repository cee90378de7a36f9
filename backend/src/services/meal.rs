//! Meal logging with derived nutrient totals

use super::list_filter;
use crate::error::ApiError;
use crate::repositories::MealRepository;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use fittrack_shared::types::{
    CreateMealRequest, DailyMealsResponse, MealListQuery, PaginatedResponse, StatsResponse, UpdateMealRequest,
};
use fittrack_shared::{aggregate, MealEntry, MealRecord, Period, TimeWindow};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

pub struct MealService;

impl MealService {
    pub async fn create(pool: &PgPool, user_id: Uuid, req: CreateMealRequest) -> Result<MealRecord, ApiError> {
        req.validate()?;
        let entry = MealEntry::new(req.name, req.meal_type, req.date, req.foods, req.notes)?;

        let record = MealRepository::create(pool, user_id, &entry)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            user_id = %user_id,
            meal_id = %record.id,
            meal_type = %record.meal_type,
            total_calories = record.totals.total_calories,
            "Meal logged"
        );
        Ok(record)
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<MealRecord, ApiError> {
        MealRepository::find_by_id(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))
    }

    /// Totals are recomputed from the resulting food list
    pub async fn update(pool: &PgPool, user_id: Uuid, id: Uuid, req: UpdateMealRequest) -> Result<MealRecord, ApiError> {
        req.validate()?;
        let existing = Self::get(pool, user_id, id).await?;
        let entry = MealEntry::from_record(&existing).apply(req.into())?;

        let record = MealRepository::update(pool, user_id, id, &entry)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))?;

        info!(user_id = %user_id, meal_id = %id, "Meal updated");
        Ok(record)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !MealRepository::delete(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Meal not found".to_string()));
        }

        info!(user_id = %user_id, meal_id = %id, "Meal deleted");
        Ok(())
    }

    pub async fn list(pool: &PgPool, user_id: Uuid, query: MealListQuery) -> Result<PaginatedResponse<MealRecord>, ApiError> {
        let filter = list_filter(
            query.start,
            query.end,
            query.limit,
            query.offset,
            query.meal_type.map(|t| t.as_str().to_string()),
        )?;

        let (data, total) = MealRepository::list(pool, user_id, &filter)
            .await
            .map_err(ApiError::Internal)?;

        Ok(PaginatedResponse {
            data,
            total,
            limit: filter.page.limit,
            offset: filter.page.offset,
        })
    }

    pub async fn stats(pool: &PgPool, user_id: Uuid, period: Period, now: DateTime<Utc>) -> Result<StatsResponse, ApiError> {
        let window = TimeWindow::for_period(period, now)?;
        let meals = MealRepository::find_in_range(pool, user_id, &window)
            .await
            .map_err(ApiError::Internal)?;
        debug!(user_id = %user_id, %period, count = meals.len(), "Aggregating meals");

        Ok(StatsResponse {
            period,
            summary: aggregate(user_id, &meals, &window),
        })
    }

    /// One local calendar day of meals with totals and the per-meal-type breakdown
    pub async fn daily(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        offset: FixedOffset,
    ) -> Result<DailyMealsResponse, ApiError> {
        let window = TimeWindow::day(date, offset)?;
        let meals = MealRepository::find_in_range(pool, user_id, &window)
            .await
            .map_err(ApiError::Internal)?;

        Ok(DailyMealsResponse {
            date,
            summary: aggregate(user_id, &meals, &window),
            meals,
        })
    }
}
