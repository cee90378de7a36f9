//! Workout routes, the MET catalogue and calorie estimates

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::WorkoutService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fittrack_shared::types::{
    exercise_catalogue, CalorieEstimate, CreateWorkoutRequest, EstimateCaloriesRequest, ExerciseCatalogEntry,
    PaginatedResponse, PeriodQuery, StatsResponse, UpdateWorkoutRequest, WorkoutListQuery,
};
use fittrack_shared::WorkoutRecord;
use uuid::Uuid;

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_workout).get(list_workouts))
        .route("/exercises", get(list_exercises))
        .route("/estimate", post(estimate_calories))
        .route("/stats", get(workout_stats))
        .route("/:id", get(get_workout).put(update_workout).delete(delete_workout))
}

/// POST /api/v1/workouts
async fn create_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateWorkoutRequest>,
) -> ApiResult<Json<WorkoutRecord>> {
    Ok(Json(WorkoutService::create(state.db(), auth.user_id, req).await?))
}

/// GET /api/v1/workouts
async fn list_workouts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WorkoutListQuery>,
) -> ApiResult<Json<PaginatedResponse<WorkoutRecord>>> {
    Ok(Json(WorkoutService::list(state.db(), auth.user_id, query).await?))
}

async fn get_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkoutRecord>> {
    Ok(Json(WorkoutService::get(state.db(), auth.user_id, id).await?))
}

async fn update_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateWorkoutRequest>,
) -> ApiResult<Json<WorkoutRecord>> {
    Ok(Json(WorkoutService::update(state.db(), auth.user_id, id, req).await?))
}

async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    WorkoutService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/workouts/exercises
async fn list_exercises(_auth: AuthUser) -> Json<Vec<ExerciseCatalogEntry>> {
    Json(exercise_catalogue())
}

/// POST /api/v1/workouts/estimate
async fn estimate_calories(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<EstimateCaloriesRequest>,
) -> ApiResult<Json<CalorieEstimate>> {
    Ok(Json(WorkoutService::estimate(state.db(), auth.user_id, req).await?))
}

/// GET /api/v1/workouts/stats?period=
async fn workout_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<StatsResponse>> {
    let period = query.period()?;
    Ok(Json(WorkoutService::stats(state.db(), auth.user_id, period, Utc::now()).await?))
}
