//! Liveness and readiness probes
//!
//! `/health` and `/health/live` answer as long as the process runs;
//! `/health/ready` also pings the database and answers 503 when it is down.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<CheckStatus>,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn respond(status: &'static str, database: Option<CheckStatus>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    respond("healthy", None)
}

pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::ping(state.db()).await {
        Ok(()) => Ok(respond(
            "ready",
            Some(CheckStatus {
                healthy: true,
                message: None,
            }),
        )),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            respond(
                "not_ready",
                Some(CheckStatus {
                    healthy: false,
                    message: Some(e.to_string()),
                }),
            ),
        )),
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    respond("alive", None)
}
