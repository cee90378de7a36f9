//! Body progress entries; BMI is computed on read from the current height

use super::{list_filter, load_profile};
use crate::error::ApiError;
use crate::repositories::ProgressRepository;
use chrono::{DateTime, Utc};
use fittrack_shared::types::{
    CreateProgressRequest, PaginatedResponse, ProgressListQuery, ProgressResponse, StatsResponse,
    UpdateProgressRequest,
};
use fittrack_shared::{aggregate, Period, ProgressEntry, ProgressRecord, TimeWindow};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

pub struct ProgressService;

impl ProgressService {
    async fn height_cm(pool: &PgPool, user_id: Uuid) -> Result<f64, ApiError> {
        Ok(load_profile(pool, user_id).await?.height_cm)
    }

    async fn find(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<ProgressRecord, ApiError> {
        ProgressRepository::find_by_id(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Progress entry not found".to_string()))
    }

    pub async fn create(pool: &PgPool, user_id: Uuid, req: CreateProgressRequest) -> Result<ProgressResponse, ApiError> {
        req.validate()?;
        let entry = ProgressEntry::new(
            req.date,
            req.weight_kg,
            req.body_fat_percent,
            req.muscle_mass_kg,
            req.measurements,
            req.notes,
        )?;

        let record = ProgressRepository::create(pool, user_id, &entry)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            user_id = %user_id,
            progress_id = %record.id,
            weight_kg = record.weight_kg,
            "Progress entry logged"
        );
        Ok(ProgressResponse::new(record, Self::height_cm(pool, user_id).await?))
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<ProgressResponse, ApiError> {
        let record = Self::find(pool, user_id, id).await?;
        Ok(ProgressResponse::new(record, Self::height_cm(pool, user_id).await?))
    }

    pub async fn latest(pool: &PgPool, user_id: Uuid) -> Result<ProgressResponse, ApiError> {
        let record = ProgressRepository::find_latest(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("No progress entries yet".to_string()))?;
        Ok(ProgressResponse::new(record, Self::height_cm(pool, user_id).await?))
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: UpdateProgressRequest,
    ) -> Result<ProgressResponse, ApiError> {
        req.validate()?;
        let existing = Self::find(pool, user_id, id).await?;
        let entry = ProgressEntry::from_record(&existing).apply(req.into())?;

        let record = ProgressRepository::update(pool, user_id, id, &entry)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Progress entry not found".to_string()))?;

        info!(user_id = %user_id, progress_id = %id, "Progress entry updated");
        Ok(ProgressResponse::new(record, Self::height_cm(pool, user_id).await?))
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !ProgressRepository::delete(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Progress entry not found".to_string()));
        }

        info!(user_id = %user_id, progress_id = %id, "Progress entry deleted");
        Ok(())
    }

    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: ProgressListQuery,
    ) -> Result<PaginatedResponse<ProgressResponse>, ApiError> {
        let filter = list_filter(query.start, query.end, query.limit, query.offset, None)?;

        let (records, total) = ProgressRepository::list(pool, user_id, &filter)
            .await
            .map_err(ApiError::Internal)?;
        let height_cm = Self::height_cm(pool, user_id).await?;

        Ok(PaginatedResponse {
            data: records
                .into_iter()
                .map(|r| ProgressResponse::new(r, height_cm))
                .collect(),
            total,
            limit: filter.page.limit,
            offset: filter.page.offset,
        })
    }

    pub async fn stats(pool: &PgPool, user_id: Uuid, period: Period, now: DateTime<Utc>) -> Result<StatsResponse, ApiError> {
        let window = TimeWindow::for_period(period, now)?;
        let entries = ProgressRepository::find_in_range(pool, user_id, &window)
            .await
            .map_err(ApiError::Internal)?;
        debug!(user_id = %user_id, %period, count = entries.len(), "Aggregating progress");

        Ok(StatsResponse {
            period,
            summary: aggregate(user_id, &entries, &window),
        })
    }
}
