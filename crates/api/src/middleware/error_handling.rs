//! # Error Handling Middleware
//!
//! Maps `ScheduleError` onto HTTP status codes and a JSON `{ "error": ... }`
//! body so every handler reports failures the same way.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fieldslot_core::errors::ScheduleError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// Handlers return `Result<_, AppError>` and use `?` on engine calls.
#[derive(Debug)]
pub struct AppError(pub ScheduleError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::ScheduleAlreadyExists => StatusCode::CONFLICT,
            ScheduleError::InvalidStatus(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScheduleError::Validation(_) => StatusCode::BAD_REQUEST,
            ScheduleError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details stay in the logs
        let message = match &self.0 {
            ScheduleError::Storage(report) => {
                tracing::error!("Storage failure: {:?}", report);
                "Internal server error".to_string()
            }
            err => err.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(ScheduleError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(ScheduleError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(ScheduleError::Validation(rejection.body_text()))
    }
}

/// Maps a ScheduleError directly to an HTTP response.
pub fn map_error(err: ScheduleError) -> Response {
    AppError(err).into_response()
}
