//! # Fieldslot API
//!
//! HTTP surface for the field schedule service: time ranges, fields, and
//! the per-field booking slots generated from them.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths and methods
//! - **Handlers**: extract requests and call into the engine
//! - **Middleware**: error-to-response mapping
//! - **Config**: environment configuration
//!
//! Handlers only talk to the catalogs and the engine from `fieldslot-core`,
//! so the router runs the same against Postgres or the in-memory store.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
};
use eyre::Result;
use fieldslot_core::{
    catalog::{FieldCatalog, TimeCatalog},
    clock::Clock,
    engine::FieldScheduleEngine,
    store::{FieldStore, SlotStore, TimeStore},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state handed to every handler.
pub struct ApiState {
    pub field_schedules: FieldScheduleEngine,
    pub times: TimeCatalog,
    pub fields: FieldCatalog,
}

impl ApiState {
    /// Wires the catalogs and the engine onto one store.
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>, window_days: u32) -> Self
    where
        S: TimeStore + FieldStore + SlotStore + 'static,
    {
        let times: Arc<dyn TimeStore> = store.clone();
        let fields: Arc<dyn FieldStore> = store.clone();
        let slots: Arc<dyn SlotStore> = store;

        Self {
            field_schedules: FieldScheduleEngine::new(fields.clone(), times.clone(), slots, clock)
                .with_window_days(window_days),
            times: TimeCatalog::new(times),
            fields: FieldCatalog::new(fields),
        }
    }
}

/// Builds the application router with every route attached.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::time::routes())
        .merge(routes::field::routes())
        .merge(routes::field_schedule::routes())
        .with_state(state)
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Unhandled internal error: {err}") })),
        )
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Installs logging, applies the CORS and timeout layers and serves the
/// router until the process exits.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "Server listening on http://{} (timezone {}, window {} days)",
        addr, config.schedule_timezone, config.schedule_window_days
    );
    axum::serve(listener, app).await?;

    Ok(())
}
