//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ScoutService;
use crate::server::routes::{
    analysis_handler, export_handler, files_handler, health_handler, home_handler,
    statistics_handler, status_handler, trigger_all_handler, trigger_portal_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scout: Arc<ScoutService>,
    pub update_interval_hours: u64,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(scout: Arc<ScoutService>, update_interval_hours: u64) -> Self {
        Self {
            scout,
            update_interval_hours,
            started_at: Utc::now(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/statistics", get(statistics_handler))
        .route("/analysis/:scope", get(analysis_handler))
        .route("/trigger", post(trigger_all_handler))
        .route("/trigger/:portal", post(trigger_portal_handler))
        .route("/export/:scope/:format", get(export_handler))
        .route("/files", get(files_handler))
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
