//! Dashboard and analytics
//!
//! Fetches the records each window needs concurrently, then hands them to the
//! pure composers in `fittrack_shared::dashboard`. Record access goes through
//! [`DashboardSource`] so composition can be exercised without a database.

use super::load_profile;
use crate::error::ApiError;
use crate::repositories::{MealRepository, ProgressRepository, SleepRepository, WorkoutRepository};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use fittrack_shared::aggregation::local_date;
use fittrack_shared::{
    compose_analytics, compose_dashboard, compose_week, AnalyticsInput, AnalyticsReport, DashboardInput,
    DashboardSnapshot, MealRecord, Period, ProgressRecord, SleepRecord, TimeWindow, UserProfile, WeekSection,
    WorkoutRecord,
};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Per-user record reads the dashboard is composed from
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn profile(&self, user_id: Uuid) -> Result<UserProfile, ApiError>;
    async fn workouts(&self, user_id: Uuid, window: &TimeWindow) -> Result<Vec<WorkoutRecord>, ApiError>;
    async fn meals(&self, user_id: Uuid, window: &TimeWindow) -> Result<Vec<MealRecord>, ApiError>;
    async fn sleep(&self, user_id: Uuid, window: &TimeWindow) -> Result<Vec<SleepRecord>, ApiError>;
    async fn progress(&self, user_id: Uuid, window: &TimeWindow) -> Result<Vec<ProgressRecord>, ApiError>;
}

/// [`DashboardSource`] over the Postgres repositories
pub struct PgDashboardSource<'a> {
    pool: &'a PgPool,
}

impl<'a> PgDashboardSource<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> DashboardSource for PgDashboardSource<'a> {
    async fn profile(&self, user_id: Uuid) -> Result<UserProfile, ApiError> {
        load_profile(self.pool, user_id).await
    }

    async fn workouts(&self, user_id: Uuid, window: &TimeWindow) -> Result<Vec<WorkoutRecord>, ApiError> {
        WorkoutRepository::find_in_range(self.pool, user_id, window)
            .await
            .map_err(ApiError::Internal)
    }

    async fn meals(&self, user_id: Uuid, window: &TimeWindow) -> Result<Vec<MealRecord>, ApiError> {
        MealRepository::find_in_range(self.pool, user_id, window)
            .await
            .map_err(ApiError::Internal)
    }

    async fn sleep(&self, user_id: Uuid, window: &TimeWindow) -> Result<Vec<SleepRecord>, ApiError> {
        SleepRepository::find_in_range(self.pool, user_id, window)
            .await
            .map_err(ApiError::Internal)
    }

    async fn progress(&self, user_id: Uuid, window: &TimeWindow) -> Result<Vec<ProgressRecord>, ApiError> {
        ProgressRepository::find_in_range(self.pool, user_id, window)
            .await
            .map_err(ApiError::Internal)
    }
}

/// Resolved request context for a dashboard view
#[derive(Debug, Clone, Copy)]
pub struct DashboardParams {
    /// Local calendar day; defaults to today in `offset`
    pub date: Option<NaiveDate>,
    pub offset: FixedOffset,
    pub lookback_days: u32,
    pub now: DateTime<Utc>,
}

impl DashboardParams {
    fn day(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| local_date(self.now, self.offset))
    }
}

pub struct DashboardService;

impl DashboardService {
    pub async fn snapshot<S: DashboardSource>(
        source: &S,
        user_id: Uuid,
        params: DashboardParams,
    ) -> Result<DashboardSnapshot, ApiError> {
        let date = params.day();
        let week = TimeWindow::week_of(date, params.offset)?;
        let recent = TimeWindow::last_days(params.now, params.lookback_days)?;
        let month = TimeWindow::month_to_date(params.now, params.offset)?;

        let (profile, workouts, meals, sleep, recent_progress, monthly_progress) = tokio::try_join!(
            source.profile(user_id),
            source.workouts(user_id, &week),
            source.meals(user_id, &week),
            source.sleep(user_id, &week),
            source.progress(user_id, &recent),
            source.progress(user_id, &month),
        )?;

        Ok(compose_dashboard(&DashboardInput {
            user_id,
            profile: &profile,
            date,
            now: params.now,
            offset: params.offset,
            lookback_days: params.lookback_days,
            workouts: &workouts,
            meals: &meals,
            sleep: &sleep,
            recent_progress: &recent_progress,
            monthly_progress: &monthly_progress,
        })?)
    }

    /// The Sunday-start week containing the requested day
    pub async fn weekly<S: DashboardSource>(
        source: &S,
        user_id: Uuid,
        params: DashboardParams,
    ) -> Result<WeekSection, ApiError> {
        let date = params.day();
        let week = TimeWindow::week_of(date, params.offset)?;

        let (workouts, meals, sleep) = tokio::try_join!(
            source.workouts(user_id, &week),
            source.meals(user_id, &week),
            source.sleep(user_id, &week),
        )?;

        Ok(compose_week(user_id, date, params.offset, &workouts, &meals, &sleep)?)
    }

    pub async fn analytics<S: DashboardSource>(
        source: &S,
        user_id: Uuid,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<AnalyticsReport, ApiError> {
        let window = TimeWindow::for_period(period, now)?;

        let (workouts, meals, sleep, progress) = tokio::try_join!(
            source.workouts(user_id, &window),
            source.meals(user_id, &window),
            source.sleep(user_id, &window),
            source.progress(user_id, &window),
        )?;
        debug!(user_id = %user_id, %period, "Composing analytics");

        Ok(compose_analytics(&AnalyticsInput {
            user_id,
            period,
            now,
            workouts: &workouts,
            meals: &meals,
            sleep: &sleep,
            progress: &progress,
        })?)
    }
}
