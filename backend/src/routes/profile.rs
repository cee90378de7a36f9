//! Body profile with derived BMI, BMR and daily calorie need

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use fittrack_shared::types::{ProfileResponse, UpdateProfileRequest};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

/// GET /api/v1/profile
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProfileResponse>> {
    Ok(Json(ProfileService::get(state.db(), auth.user_id).await?))
}

/// PUT /api/v1/profile
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    Ok(Json(ProfileService::update(state.db(), auth.user_id, req).await?))
}
