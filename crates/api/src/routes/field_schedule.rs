use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers::field_schedule as handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/field-schedules", post(handlers::create_field_schedules))
        .route(
            "/api/field-schedules/one-month",
            post(handlers::generate_one_month),
        )
        .route(
            "/api/field-schedules/pagination",
            get(handlers::list_with_pagination),
        )
        .route(
            "/api/field-schedules/status",
            patch(handlers::update_status_batch),
        )
        .route(
            "/api/field-schedules/fields/:uuid",
            get(handlers::list_by_field_and_date),
        )
        .route(
            "/api/field-schedules/:uuid",
            get(handlers::get_field_schedule)
                .put(handlers::update_field_schedule)
                .delete(handlers::delete_field_schedule),
        )
        .route(
            "/api/field-schedules/:uuid/status",
            patch(handlers::update_status),
        )
}
