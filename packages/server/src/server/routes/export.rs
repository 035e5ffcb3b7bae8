use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::ApiError;
use crate::kernel::Scope;
use crate::server::app::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Download the approved table of `eu`, `uk` or `combined` as CSV or JSON
pub async fn export_handler(
    Extension(state): Extension<AppState>,
    Path((scope, format)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let format = ExportFormat::parse(&format)
        .ok_or_else(|| ApiError::bad_request("Unsupported format. Use: csv, json"))?;
    let scope: Scope = scope
        .parse()
        .map_err(|_| ApiError::bad_request("Unsupported analysis type. Use: eu, uk, combined"))?;

    let table = state.scout.approved_table(scope).ok_or_else(|| {
        ApiError::not_found(format!("No {} data available for export", scope.as_str()))
    })?;

    let body = match format {
        ExportFormat::Csv => table.to_csv_string(),
        ExportFormat::Json => table.to_json_string(),
    }
    .map_err(|e| {
        tracing::error!(error = %e, "Export failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Export failed: {e}"))
    })?;

    let filename = format!(
        "{}_analysis_{}.{}",
        scope.as_str(),
        Utc::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
