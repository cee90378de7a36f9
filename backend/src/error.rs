//! Application error handling
//!
//! Every handler returns [`ApiResult`]; errors render as
//! `{"error": {"code", "message", "field"?}}` with a matching status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fittrack_shared::validation::field_label;
use fittrack_shared::MetricsError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::{ValidationError, ValidationErrors};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error on {field}: {message}")]
    FieldValidation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<MetricsError> for ApiError {
    fn from(err: MetricsError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    let param = |name: &str| err.params.get(name).map(|v| v.to_string());
    match err.code.as_ref() {
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
            _ => "is out of range".to_string(),
        },
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("length must be between {} and {}", min, max),
            (Some(min), None) => format!("length must be at least {}", min),
            (None, Some(max)) => format!("length must be at most {}", max),
            _ => "has an invalid length".to_string(),
        },
        "email" => "must be a valid email address".to_string(),
        code => format!("failed {} validation", code),
    }
}

impl From<ValidationErrors> for ApiError {
    /// Reports the first failing field, in field-name order
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.into_iter().find_map(|(field, errs)| errs.first().map(|e| (field, e))) {
            Some((field, err)) => {
                let field = field.to_string();
                ApiError::FieldValidation {
                    message: format!("{} {}", field_label(&field), describe(err)),
                    field,
                }
            }
            None => ApiError::Validation(errors.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::FieldValidation { field: name, message } => {
                field = Some(name);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fittrack_shared::types::UpdateProfileRequest;
    use validator::Validate;

    #[test]
    fn test_validation_error_status() {
        let response = ApiError::Validation("Invalid input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status() {
        let response = ApiError::NotFound("Workout not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_error_status() {
        let response = ApiError::Unauthorized("Invalid token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_metrics_error_maps_to_validation() {
        let err: ApiError = MetricsError::InvalidExerciseCombo {
            exercise_type: "tennis".to_string(),
            intensity: "6 mph".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_errors_name_the_field() {
        let req = UpdateProfileRequest {
            height_cm: Some(300.0),
            ..Default::default()
        };
        let err: ApiError = req.validate().unwrap_err().into();
        match err {
            ApiError::FieldValidation { field, message } => {
                assert_eq!(field, "height_cm");
                assert!(message.starts_with("Height"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
