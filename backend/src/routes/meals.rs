//! Meal routes and the daily nutrition view

use super::request_offset;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::MealService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fittrack_shared::aggregation::local_date;
use fittrack_shared::types::{
    CreateMealRequest, DailyMealsResponse, DayQuery, MealListQuery, PaginatedResponse, PeriodQuery, StatsResponse,
    UpdateMealRequest,
};
use fittrack_shared::MealRecord;
use uuid::Uuid;

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_meal).get(list_meals))
        .route("/daily", get(daily_meals))
        .route("/stats", get(meal_stats))
        .route("/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

/// POST /api/v1/meals
async fn create_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMealRequest>,
) -> ApiResult<Json<MealRecord>> {
    Ok(Json(MealService::create(state.db(), auth.user_id, req).await?))
}

/// GET /api/v1/meals
async fn list_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MealListQuery>,
) -> ApiResult<Json<PaginatedResponse<MealRecord>>> {
    Ok(Json(MealService::list(state.db(), auth.user_id, query).await?))
}

async fn get_meal(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> ApiResult<Json<MealRecord>> {
    Ok(Json(MealService::get(state.db(), auth.user_id, id).await?))
}

async fn update_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMealRequest>,
) -> ApiResult<Json<MealRecord>> {
    Ok(Json(MealService::update(state.db(), auth.user_id, id, req).await?))
}

async fn delete_meal(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    MealService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/meals/daily?date=&tz_offset_minutes=
async fn daily_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DayQuery>,
) -> ApiResult<Json<DailyMealsResponse>> {
    let offset = request_offset(&state, query.tz_offset_minutes)?;
    let date = query.date.unwrap_or_else(|| local_date(Utc::now(), offset));
    Ok(Json(MealService::daily(state.db(), auth.user_id, date, offset).await?))
}

/// GET /api/v1/meals/stats?period=
async fn meal_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<StatsResponse>> {
    let period = query.period()?;
    Ok(Json(MealService::stats(state.db(), auth.user_id, period, Utc::now()).await?))
}
