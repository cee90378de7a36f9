//! Sleep log routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::SleepService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fittrack_shared::types::{
    CreateSleepRequest, PaginatedResponse, PeriodQuery, SleepListQuery, SleepResponse, StatsResponse,
    UpdateSleepRequest,
};
use uuid::Uuid;

pub fn sleep_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_sleep).get(list_sleep))
        .route("/stats", get(sleep_stats))
        .route("/:id", get(get_sleep).put(update_sleep).delete(delete_sleep))
}

/// POST /api/v1/sleep
async fn create_sleep(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateSleepRequest>,
) -> ApiResult<Json<SleepResponse>> {
    Ok(Json(SleepService::create(state.db(), auth.user_id, req).await?))
}

/// GET /api/v1/sleep
async fn list_sleep(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SleepListQuery>,
) -> ApiResult<Json<PaginatedResponse<SleepResponse>>> {
    Ok(Json(SleepService::list(state.db(), auth.user_id, query).await?))
}

async fn get_sleep(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> ApiResult<Json<SleepResponse>> {
    Ok(Json(SleepService::get(state.db(), auth.user_id, id).await?))
}

async fn update_sleep(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSleepRequest>,
) -> ApiResult<Json<SleepResponse>> {
    Ok(Json(SleepService::update(state.db(), auth.user_id, id, req).await?))
}

async fn delete_sleep(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    SleepService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sleep/stats?period=
async fn sleep_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<StatsResponse>> {
    let period = query.period()?;
    Ok(Json(SleepService::stats(state.db(), auth.user_id, period, Utc::now()).await?))
}
