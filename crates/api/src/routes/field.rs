use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/fields", get(handlers::field::list_fields))
        .route(
            "/api/fields/pagination",
            get(handlers::field::list_fields_with_pagination),
        )
        .route("/api/fields/:uuid", get(handlers::field::get_field))
}
