use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use funding_pipeline::CheckpointFile;
use indexmap::IndexMap;
use serde::Serialize;

use crate::kernel::Portal;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct FilesResponse {
    files: IndexMap<Portal, Vec<CheckpointFile>>,
    timestamp: DateTime<Utc>,
}

/// Checkpoint files per portal, with size and modification time
pub async fn files_handler(Extension(state): Extension<AppState>) -> Json<FilesResponse> {
    Json(FilesResponse {
        files: Portal::ALL
            .into_iter()
            .map(|portal| (portal, state.scout.checkpoint_files(portal)))
            .collect(),
        timestamp: Utc::now(),
    })
}
