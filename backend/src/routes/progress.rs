//! Body progress routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProgressService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fittrack_shared::types::{
    CreateProgressRequest, PaginatedResponse, PeriodQuery, ProgressListQuery, ProgressResponse, StatsResponse,
    UpdateProgressRequest,
};
use uuid::Uuid;

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_progress).get(list_progress))
        .route("/latest", get(latest_progress))
        .route("/stats", get(progress_stats))
        .route("/:id", get(get_progress).put(update_progress).delete(delete_progress))
}

/// POST /api/v1/progress
async fn create_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProgressRequest>,
) -> ApiResult<Json<ProgressResponse>> {
    Ok(Json(ProgressService::create(state.db(), auth.user_id, req).await?))
}

/// GET /api/v1/progress
async fn list_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ProgressListQuery>,
) -> ApiResult<Json<PaginatedResponse<ProgressResponse>>> {
    Ok(Json(ProgressService::list(state.db(), auth.user_id, query).await?))
}

/// GET /api/v1/progress/latest
async fn latest_progress(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProgressResponse>> {
    Ok(Json(ProgressService::latest(state.db(), auth.user_id).await?))
}

async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProgressResponse>> {
    Ok(Json(ProgressService::get(state.db(), auth.user_id, id).await?))
}

async fn update_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProgressRequest>,
) -> ApiResult<Json<ProgressResponse>> {
    Ok(Json(ProgressService::update(state.db(), auth.user_id, id, req).await?))
}

async fn delete_progress(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    ProgressService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/progress/stats?period=
async fn progress_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<StatsResponse>> {
    let period = query.period()?;
    Ok(Json(ProgressService::stats(state.db(), auth.user_id, period, Utc::now()).await?))
}
