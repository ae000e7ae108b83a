use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/times",
            get(handlers::time::list_times).post(handlers::time::create_time),
        )
        .route("/api/times/:uuid", get(handlers::time::get_time))
}
