//! Workout logging, listing, stats and calorie estimates

use super::{list_filter, load_profile};
use crate::error::ApiError;
use crate::repositories::WorkoutRepository;
use chrono::{DateTime, Utc};
use fittrack_shared::types::{
    CalorieEstimate, CreateWorkoutRequest, EstimateCaloriesRequest, PaginatedResponse, StatsResponse,
    UpdateWorkoutRequest, WorkoutListQuery,
};
use fittrack_shared::{aggregate, calculate_calories_burned, Period, TimeWindow, WorkoutEntry, WorkoutRecord};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

pub struct WorkoutService;

impl WorkoutService {
    /// Calories burned are computed from the caller's current weight
    pub async fn create(pool: &PgPool, user_id: Uuid, req: CreateWorkoutRequest) -> Result<WorkoutRecord, ApiError> {
        req.validate()?;
        let profile = load_profile(pool, user_id).await?;

        let entry = WorkoutEntry::new(
            req.exercise_type,
            req.intensity,
            req.duration_minutes,
            req.date,
            req.notes,
            profile.weight_kg,
        )?;

        let record = WorkoutRepository::create(pool, user_id, &entry)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            user_id = %user_id,
            workout_id = %record.id,
            exercise_type = %record.exercise_type,
            calories_burned = record.calories_burned,
            "Workout logged"
        );
        Ok(record)
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<WorkoutRecord, ApiError> {
        WorkoutRepository::find_by_id(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: UpdateWorkoutRequest,
    ) -> Result<WorkoutRecord, ApiError> {
        req.validate()?;
        let existing = Self::get(pool, user_id, id).await?;
        let profile = load_profile(pool, user_id).await?;

        let entry = WorkoutEntry::from_record(&existing).apply(req.into(), profile.weight_kg)?;

        let record = WorkoutRepository::update(pool, user_id, id, &entry)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))?;

        info!(user_id = %user_id, workout_id = %id, "Workout updated");
        Ok(record)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let deleted = WorkoutRepository::delete(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound("Workout not found".to_string()));
        }

        info!(user_id = %user_id, workout_id = %id, "Workout deleted");
        Ok(())
    }

    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: WorkoutListQuery,
    ) -> Result<PaginatedResponse<WorkoutRecord>, ApiError> {
        let filter = list_filter(
            query.start,
            query.end,
            query.limit,
            query.offset,
            query.exercise_type.map(|t| t.as_str().to_string()),
        )?;

        let (data, total) = WorkoutRepository::list(pool, user_id, &filter)
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
        let workouts = WorkoutRepository::find_in_range(pool, user_id, &window)
            .await
            .map_err(ApiError::Internal)?;
        debug!(user_id = %user_id, %period, count = workouts.len(), "Aggregating workouts");

        Ok(StatsResponse {
            period,
            summary: aggregate(user_id, &workouts, &window),
        })
    }

    /// Preview the calories a workout would burn without storing it
    pub async fn estimate(pool: &PgPool, user_id: Uuid, req: EstimateCaloriesRequest) -> Result<CalorieEstimate, ApiError> {
        req.validate()?;
        let profile = load_profile(pool, user_id).await?;
        estimate_for(req, profile.weight_kg)
    }
}

fn estimate_for(req: EstimateCaloriesRequest, weight_kg: f64) -> Result<CalorieEstimate, ApiError> {
    let intensity = req.intensity.trim().to_string();
    let met = req.exercise_type.met(&intensity)?;
    let calories_burned = calculate_calories_burned(req.exercise_type, &intensity, req.duration_minutes, weight_kg)?;

    Ok(CalorieEstimate {
        exercise_type: req.exercise_type,
        intensity,
        duration_minutes: req.duration_minutes,
        weight_kg,
        met,
        calories_burned,
    })
}
