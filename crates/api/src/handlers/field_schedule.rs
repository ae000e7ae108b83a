use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use fieldslot_core::{
    models::field_schedule::{
        FieldScheduleByDateParam, FieldScheduleForBookingResponse, FieldScheduleRequest,
        FieldScheduleRequestParam, FieldScheduleResponse, GenerateFieldScheduleRequest,
        UpdateFieldScheduleRequest, UpdateStatusBatchRequest, UpdateStatusRequest,
    },
    pagination::PaginationResult,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub created: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatedResponse {
    pub updated: u64,
}

#[axum::debug_handler]
pub async fn generate_one_month(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<GenerateFieldScheduleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(payload) = payload?;
    let created = state.field_schedules.generate_month(&payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { created })))
}

#[axum::debug_handler]
pub async fn create_field_schedules(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<FieldScheduleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(payload) = payload?;
    let created = state.field_schedules.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { created })))
}

#[axum::debug_handler]
pub async fn list_by_field_and_date(
    State(state): State<Arc<ApiState>>,
    field_id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<FieldScheduleByDateParam>, QueryRejection>,
) -> Result<Json<Vec<FieldScheduleForBookingResponse>>, AppError> {
    let Path(field_id) = field_id?;
    let Query(params) = params?;
    let schedules = state
        .field_schedules
        .get_all_by_field_and_date(field_id, params.date)
        .await?;
    Ok(Json(schedules))
}

#[axum::debug_handler]
pub async fn list_with_pagination(
    State(state): State<Arc<ApiState>>,
    params: Result<Query<FieldScheduleRequestParam>, QueryRejection>,
) -> Result<Json<PaginationResult<FieldScheduleResponse>>, AppError> {
    let Query(params) = params?;
    let page = state.field_schedules.get_all_with_pagination(&params).await?;
    Ok(Json(page))
}

#[axum::debug_handler]
pub async fn get_field_schedule(
    State(state): State<Arc<ApiState>>,
    uuid: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<FieldScheduleResponse>, AppError> {
    let Path(uuid) = uuid?;
    let schedule = state.field_schedules.get_by_uuid(uuid).await?;
    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn update_field_schedule(
    State(state): State<Arc<ApiState>>,
    uuid: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateFieldScheduleRequest>, JsonRejection>,
) -> Result<Json<FieldScheduleResponse>, AppError> {
    let Path(uuid) = uuid?;
    let Json(payload) = payload?;
    let schedule = state.field_schedules.update(uuid, &payload).await?;
    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    uuid: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Path(uuid) = uuid?;
    let Json(payload) = payload?;
    state
        .field_schedules
        .update_status(uuid, &payload.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn update_status_batch(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<UpdateStatusBatchRequest>, JsonRejection>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let Json(payload) = payload?;
    let updated = state.field_schedules.update_status_batch(&payload).await?;
    Ok(Json(UpdatedResponse { updated }))
}

#[axum::debug_handler]
pub async fn delete_field_schedule(
    State(state): State<Arc<ApiState>>,
    uuid: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(uuid) = uuid?;
    state.field_schedules.delete(uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}
