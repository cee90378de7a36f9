//! Sleep logging; duration is derived from start and end

use super::list_filter;
use crate::error::ApiError;
use crate::repositories::SleepRepository;
use chrono::{DateTime, Utc};
use fittrack_shared::types::{
    CreateSleepRequest, PaginatedResponse, SleepListQuery, SleepResponse, StatsResponse, UpdateSleepRequest,
};
use fittrack_shared::{aggregate, Period, SleepEntry, TimeWindow};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

pub struct SleepService;

impl SleepService {
    pub async fn create(pool: &PgPool, user_id: Uuid, req: CreateSleepRequest) -> Result<SleepResponse, ApiError> {
        req.validate()?;
        let entry = SleepEntry::new(req.sleep_start, req.sleep_end, req.date, req.quality, req.notes)?;

        let record = SleepRepository::create(pool, user_id, &entry)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            user_id = %user_id,
            sleep_id = %record.id,
            duration_minutes = record.duration_minutes,
            "Sleep logged"
        );
        Ok(record.into())
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<SleepResponse, ApiError> {
        SleepRepository::find_by_id(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .map(SleepResponse::from)
            .ok_or_else(|| ApiError::NotFound("Sleep log not found".to_string()))
    }

    pub async fn update(pool: &PgPool, user_id: Uuid, id: Uuid, req: UpdateSleepRequest) -> Result<SleepResponse, ApiError> {
        req.validate()?;
        let existing = Self::get(pool, user_id, id).await?;
        let entry = SleepEntry::from_record(&existing.record).apply(req.into())?;

        let record = SleepRepository::update(pool, user_id, id, &entry)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Sleep log not found".to_string()))?;

        info!(user_id = %user_id, sleep_id = %id, "Sleep log updated");
        Ok(record.into())
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !SleepRepository::delete(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Sleep log not found".to_string()));
        }

        info!(user_id = %user_id, sleep_id = %id, "Sleep log deleted");
        Ok(())
    }

    pub async fn list(pool: &PgPool, user_id: Uuid, query: SleepListQuery) -> Result<PaginatedResponse<SleepResponse>, ApiError> {
        let filter = list_filter(
            query.start,
            query.end,
            query.limit,
            query.offset,
            query.quality.map(|q| q.as_str().to_string()),
        )?;

        let (records, total) = SleepRepository::list(pool, user_id, &filter)
            .await
            .map_err(ApiError::Internal)?;

        Ok(PaginatedResponse {
            data: records.into_iter().map(SleepResponse::from).collect(),
            total,
            limit: filter.page.limit,
            offset: filter.page.offset,
        })
    }

    pub async fn stats(pool: &PgPool, user_id: Uuid, period: Period, now: DateTime<Utc>) -> Result<StatsResponse, ApiError> {
        let window = TimeWindow::for_period(period, now)?;
        let logs = SleepRepository::find_in_range(pool, user_id, &window)
            .await
            .map_err(ApiError::Internal)?;
        debug!(user_id = %user_id, %period, count = logs.len(), "Aggregating sleep");

        Ok(StatsResponse {
            period,
            summary: aggregate(user_id, &logs, &window),
        })
    }
}
