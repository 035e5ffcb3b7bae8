use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: DateTime<Utc>,
    uptime_secs: i64,
    is_running: bool,
}

/// Health check endpoint
///
/// The service has no backing store, so it is healthy whenever it answers.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let now = Utc::now();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: now,
            uptime_secs: (now - state.started_at).num_seconds(),
            is_running: state.scout.is_running(),
        }),
    )
}
