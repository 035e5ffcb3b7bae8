use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::kernel::{OverallStatus, PortalAnalysis, Statistics, StatusSnapshot};
use crate::server::app::AppState;

/// Service description and endpoint map
pub async fn home_handler(Extension(state): Extension<AppState>) -> Json<Value> {
    let status = state.scout.status();

    Json(json!({
        "message": "Funding Scout: EU & UK funding analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Keyword and LLM relevance analysis of EU and UK funding opportunities",
        "endpoints": {
            "/status": "Current analysis status",
            "/analysis/eu": "EU analysis results",
            "/analysis/uk": "UK analysis results",
            "/analysis/combined": "Approved opportunities from both portals",
            "/statistics": "Analysis statistics",
            "/trigger": "Trigger a full analysis (POST)",
            "/trigger/eu": "Trigger the EU analysis only (POST)",
            "/trigger/uk": "Trigger the UK analysis only (POST)",
            "/export/{eu|uk|combined}/{csv|json}": "Download approved opportunities",
            "/files": "Saved checkpoint files",
            "/health": "Health check",
        },
        "last_update": status.last_update,
        "status": status.overall_status,
    }))
}

#[derive(Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    status: StatusSnapshot,
    next_scheduled_run: String,
}

/// Current analysis status
pub async fn status_handler(Extension(state): Extension<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: state.scout.status(),
        next_scheduled_run: format!("Every {} hours", state.update_interval_hours),
    })
}

#[derive(Serialize)]
pub struct DetailedStats {
    eu_analysis: PortalAnalysis,
    uk_analysis: PortalAnalysis,
}

#[derive(Serialize)]
pub struct StatisticsResponse {
    statistics: Statistics,
    last_update: Option<DateTime<Utc>>,
    status: OverallStatus,
    detailed_stats: DetailedStats,
}

/// Combined counters and relevance rate
pub async fn statistics_handler(
    Extension(state): Extension<AppState>,
) -> Json<StatisticsResponse> {
    let status = state.scout.status();

    Json(StatisticsResponse {
        statistics: status.statistics(),
        last_update: status.last_update,
        status: status.overall_status,
        detailed_stats: DetailedStats {
            eu_analysis: status.eu_analysis,
            uk_analysis: status.uk_analysis,
        },
    })
}
