//! Dashboard snapshot, weekly view and period analytics

use super::request_offset;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::dashboard::DashboardParams;
use crate::services::{DashboardService, PgDashboardSource};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use fittrack_shared::types::{DayQuery, PeriodQuery};
use fittrack_shared::{AnalyticsReport, DashboardSnapshot, WeekSection};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/weekly", get(weekly))
        .route("/analytics", get(analytics))
}

fn params(state: &AppState, query: &DayQuery) -> ApiResult<DashboardParams> {
    Ok(DashboardParams {
        date: query.date,
        offset: request_offset(state, query.tz_offset_minutes)?,
        lookback_days: state.config().dashboard.progress_lookback_days,
        now: Utc::now(),
    })
}

/// GET /api/v1/dashboard?date=&tz_offset_minutes=
async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DayQuery>,
) -> ApiResult<Json<DashboardSnapshot>> {
    let params = params(&state, &query)?;
    let source = PgDashboardSource::new(state.db());
    Ok(Json(DashboardService::snapshot(&source, auth.user_id, params).await?))
}

/// GET /api/v1/dashboard/weekly?date=&tz_offset_minutes=
async fn weekly(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DayQuery>,
) -> ApiResult<Json<WeekSection>> {
    let params = params(&state, &query)?;
    let source = PgDashboardSource::new(state.db());
    Ok(Json(DashboardService::weekly(&source, auth.user_id, params).await?))
}

/// GET /api/v1/dashboard/analytics?period=
async fn analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<AnalyticsReport>> {
    let period = query.period()?;
    let source = PgDashboardSource::new(state.db());
    Ok(Json(DashboardService::analytics(&source, auth.user_id, period, Utc::now()).await?))
}
