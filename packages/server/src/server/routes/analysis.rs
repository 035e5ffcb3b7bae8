use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use funding_pipeline::{Checkpoint, Table};

use super::ApiError;
use crate::kernel::scout::UnknownScope;
use crate::kernel::{Portal, PortalAnalysis, PortalStatus, Scope};
use crate::server::app::AppState;

/// A checkpoint table with its size and columns.
#[derive(Serialize)]
pub struct TableView {
    count: usize,
    columns: Vec<String>,
    data: Table,
}

impl From<Table> for TableView {
    fn from(table: Table) -> Self {
        Self {
            count: table.len(),
            columns: table.columns.clone(),
            data: table,
        }
    }
}

#[derive(Serialize)]
pub struct PortalCounts {
    projects_count: usize,
    relevant_count: usize,
    llm_analyzed_count: usize,
    approved_count: usize,
}

impl From<&PortalAnalysis> for PortalCounts {
    fn from(analysis: &PortalAnalysis) -> Self {
        Self {
            projects_count: analysis.projects_count,
            relevant_count: analysis.relevant_count,
            llm_analyzed_count: analysis.llm_analyzed_count,
            approved_count: analysis.approved_count,
        }
    }
}

#[derive(Serialize)]
pub struct PortalAnalysisResponse {
    analysis_type: &'static str,
    status: PortalStatus,
    last_update: Option<DateTime<Utc>>,
    statistics: PortalCounts,
    /// Checkpoint name → table, in pipeline order
    results: IndexMap<Checkpoint, TableView>,
}

#[derive(Serialize)]
pub struct CombinedSummary {
    total_eu_opportunities: usize,
    total_uk_opportunities: usize,
    total_opportunities: usize,
}

#[derive(Serialize)]
pub struct CombinedAnalysisResponse {
    analysis_type: &'static str,
    last_update: Option<DateTime<Utc>>,
    summary: CombinedSummary,
    results: TableView,
}

/// Latest checkpoints for `eu` or `uk`; approved rows of both for `combined`
pub async fn analysis_handler(
    Extension(state): Extension<AppState>,
    Path(scope): Path<String>,
) -> Result<Response, ApiError> {
    let scope: Scope = scope
        .parse()
        .map_err(|e: UnknownScope| ApiError::bad_request(e.to_string()))?;

    match scope {
        Scope::Portal(portal) => portal_analysis(&state, portal).map(IntoResponse::into_response),
        Scope::Combined => combined_analysis(&state).map(IntoResponse::into_response),
    }
}

fn portal_analysis(
    state: &AppState,
    portal: Portal,
) -> Result<Json<PortalAnalysisResponse>, ApiError> {
    let results: IndexMap<Checkpoint, TableView> = Checkpoint::ALL
        .into_iter()
        .filter_map(|checkpoint| {
            state
                .scout
                .checkpoint(portal, checkpoint)
                .map(|table| (checkpoint, TableView::from(table)))
        })
        .collect();

    if results.is_empty() {
        return Err(ApiError::not_found(format!("No {portal} analysis data available")));
    }

    let status = state.scout.status();
    let analysis = status.portal(portal);
    Ok(Json(PortalAnalysisResponse {
        analysis_type: portal.title(),
        status: analysis.status,
        last_update: status.last_update,
        statistics: PortalCounts::from(analysis),
        results,
    }))
}

fn combined_analysis(state: &AppState) -> Result<Json<CombinedAnalysisResponse>, ApiError> {
    let table = state
        .scout
        .approved_table(Scope::Combined)
        .ok_or_else(|| ApiError::not_found("No combined analysis data available"))?;

    let count_for = |portal: Portal| {
        state
            .scout
            .checkpoint(portal, Checkpoint::Approved)
            .map_or(0, |t| t.len())
    };
    let summary = CombinedSummary {
        total_eu_opportunities: count_for(Portal::Eu),
        total_uk_opportunities: count_for(Portal::Uk),
        total_opportunities: table.len(),
    };

    Ok(Json(CombinedAnalysisResponse {
        analysis_type: "Combined EU & UK Analysis",
        last_update: state.scout.status().last_update,
        summary,
        results: table.into(),
    }))
}
