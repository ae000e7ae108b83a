use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use fieldslot_core::{
    models::field::FieldResponse,
    pagination::{PaginationParams, PaginationResult},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_fields(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<FieldResponse>>, AppError> {
    let fields = state.fields.list_all().await?;
    Ok(Json(fields.into_iter().map(FieldResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn list_fields_with_pagination(
    State(state): State<Arc<ApiState>>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<PaginationResult<FieldResponse>>, AppError> {
    let Query(params) = params?;
    let page = state.fields.list_with_pagination(params).await?;
    Ok(Json(page.map(FieldResponse::from)))
}

#[axum::debug_handler]
pub async fn get_field(
    State(state): State<Arc<ApiState>>,
    uuid: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<FieldResponse>, AppError> {
    let Path(uuid) = uuid?;
    let field = state.fields.get_by_uuid(uuid).await?;
    Ok(Json(field.into()))
}
