//! Route definitions for the FitTrack API
//!
//! Health probes live at the root; everything else is under `/api/v1` and,
//! apart from register/login/refresh, requires a bearer access token.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use chrono::FixedOffset;
use fittrack_shared::validation::fixed_offset;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod dashboard;
mod health;
mod meals;
mod profile;
mod progress;
mod sleep;
mod workouts;


const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "FitTrack API v1" }))
        .nest("/auth", auth::auth_routes())
        .nest("/profile", profile::profile_routes())
        .nest("/workouts", workouts::workout_routes())
        .nest("/meals", meals::meal_routes())
        .nest("/sleep", sleep::sleep_routes())
        .nest("/progress", progress::progress_routes())
        .nest("/dashboard", dashboard::dashboard_routes())
}

/// `tz_offset_minutes` from the request, else the configured default
pub(crate) fn request_offset(state: &AppState, minutes: Option<i32>) -> Result<FixedOffset, ApiError> {
    match minutes {
        Some(m) => Ok(fixed_offset(m)?),
        None => Ok(state.default_offset()),
    }
}
