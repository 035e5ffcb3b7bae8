use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::ApiError;
use crate::kernel::{Portal, ScoutError};
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct TriggerResponse {
    message: String,
    status: &'static str,
    portals: Vec<Portal>,
}

/// Start a full analysis (both portals) in the background
pub async fn trigger_all_handler(
    Extension(state): Extension<AppState>,
) -> Result<(StatusCode, Json<TriggerResponse>), ApiError> {
    start(&state, Portal::ALL.to_vec(), "Full analysis triggered successfully")
}

/// Start a single-portal analysis in the background
pub async fn trigger_portal_handler(
    Extension(state): Extension<AppState>,
    Path(portal): Path<String>,
) -> Result<(StatusCode, Json<TriggerResponse>), ApiError> {
    let portal: Portal = portal
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Unknown portal: {portal} (use eu or uk)")))?;

    start(
        &state,
        vec![portal],
        &format!("{} analysis triggered successfully", portal.source_label()),
    )
}

fn start(
    state: &AppState,
    portals: Vec<Portal>,
    message: &str,
) -> Result<(StatusCode, Json<TriggerResponse>), ApiError> {
    match state.scout.try_start(portals.clone()) {
        Ok(()) => {
            tracing::info!(portals = ?portals, "Analysis triggered");
            Ok((
                StatusCode::ACCEPTED,
                Json(TriggerResponse {
                    message: message.to_string(),
                    status: "started",
                    portals,
                }),
            ))
        }
        Err(e @ ScoutError::AlreadyRunning) => Err(ApiError::new(StatusCode::CONFLICT, e.to_string())),
    }
}
