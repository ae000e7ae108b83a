use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use fieldslot_core::models::time::{TimeRequest, TimeResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_times(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<TimeResponse>>, AppError> {
    let times = state.times.list_all().await?;
    Ok(Json(times.into_iter().map(TimeResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn get_time(
    State(state): State<Arc<ApiState>>,
    uuid: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TimeResponse>, AppError> {
    let Path(uuid) = uuid?;
    let time = state.times.get_by_uuid(uuid).await?;
    Ok(Json(time.into()))
}

#[axum::debug_handler]
pub async fn create_time(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<TimeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TimeResponse>), AppError> {
    let Json(payload) = payload?;
    let time = state
        .times
        .register(payload.start_time, payload.end_time)
        .await?;
    Ok((StatusCode::CREATED, Json(time.into())))
}
