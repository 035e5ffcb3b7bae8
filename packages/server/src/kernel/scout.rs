//! Scout service: runs the EU and UK pipelines and keeps the status the API
//! reports.
//!
//! At most one analysis runs at a time across both portals. Portals run one
//! after the other; a failed portal does not stop the next one.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::Serialize;
use uuid::Uuid;

use funding_pipeline::{
    Checkpoint, CheckpointFile, HtmlLister, HttpExtractor, KeywordTable, OpenAIJudge, Pipeline, PipelineConfig,
    PipelineResult, PortalConfig, RateLimitedJudge, ReferenceProject, RunStage, Table,
};
use openai_client::OpenAIClient;

use crate::config::Config;

/// Column prepended to rows of the combined tables.
pub const SOURCE_COLUMN: &str = "Source";

const LLM_TIMEOUT: Duration = Duration::from_secs(120);

/// The two portals the service analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Eu,
    Uk,
}

impl Portal {
    pub const ALL: [Portal; 2] = [Portal::Eu, Portal::Uk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Portal::Eu => "eu",
            Portal::Uk => "uk",
        }
    }

    /// Value of the `Source` column in combined tables.
    pub fn source_label(&self) -> &'static str {
        match self {
            Portal::Eu => "EU",
            Portal::Uk => "UK",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Portal::Eu => "EU Funding Opportunities",
            Portal::Uk => "UK Funding Opportunities (UKRI)",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Portal {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eu" => Ok(Portal::Eu),
            "uk" => Ok(Portal::Uk),
            _ => Err(UnknownScope(s.to_string())),
        }
    }
}

/// One portal, or both combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Portal(Portal),
    Combined,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Portal(portal) => portal.as_str(),
            Scope::Combined => "combined",
        }
    }
}

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("combined") {
            return Ok(Scope::Combined);
        }
        s.parse().map(Scope::Portal)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown analysis type: {0} (use eu, uk or combined)")]
pub struct UnknownScope(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("analysis already running")]
    AlreadyRunning,
}

/// Overall status of the latest analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    NotStarted,
    Running,
    Completed,
    PartialSuccess,
    Failed,
}

impl OverallStatus {
    fn from_outcomes(succeeded: usize, total: usize) -> Self {
        match succeeded {
            0 => OverallStatus::Failed,
            n if n == total => OverallStatus::Completed,
            _ => OverallStatus::PartialSuccess,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalStatus {
    NotStarted,
    /// Results loaded from checkpoint files of an earlier process.
    Restored,
    Running,
    Completed,
    Failed,
}

/// Per-portal counters of the latest run.
#[derive(Debug, Clone, Serialize)]
pub struct PortalAnalysis {
    pub status: PortalStatus,
    pub stage: RunStage,
    pub projects_count: usize,
    pub relevant_count: usize,
    pub llm_analyzed_count: usize,
    pub approved_count: usize,
    pub skipped_records: usize,
    pub error: Option<String>,
    pub run_id: Option<Uuid>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for PortalAnalysis {
    fn default() -> Self {
        Self {
            status: PortalStatus::NotStarted,
            stage: RunStage::Idle,
            projects_count: 0,
            relevant_count: 0,
            llm_analyzed_count: 0,
            approved_count: 0,
            skipped_records: 0,
            error: None,
            run_id: None,
            finished_at: None,
        }
    }
}

impl PortalAnalysis {
    fn record(&mut self, result: &PipelineResult) {
        let stats = &result.stats;
        self.status = PortalStatus::Completed;
        self.projects_count = stats.listings;
        self.relevant_count = stats.relevant;
        self.llm_analyzed_count = stats.judged;
        self.approved_count = stats.approved;
        self.skipped_records = stats.skipped_records;
        self.error = None;
        self.run_id = Some(result.run_id);
        self.finished_at = Some(result.finished_at);
    }
}

/// Point-in-time view of the service for `/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub overall_status: OverallStatus,
    pub last_update: Option<DateTime<Utc>>,
    pub is_running: bool,
    pub error_message: Option<String>,
    pub eu_analysis: PortalAnalysis,
    pub uk_analysis: PortalAnalysis,
}

impl StatusSnapshot {
    pub fn portal(&self, portal: Portal) -> &PortalAnalysis {
        match portal {
            Portal::Eu => &self.eu_analysis,
            Portal::Uk => &self.uk_analysis,
        }
    }

    pub fn statistics(&self) -> Statistics {
        let (eu, uk) = (&self.eu_analysis, &self.uk_analysis);
        let total_projects = eu.projects_count + uk.projects_count;
        let total_relevant = eu.relevant_count + uk.relevant_count;

        Statistics {
            total_projects,
            total_relevant,
            total_llm_analyzed: eu.llm_analyzed_count + uk.llm_analyzed_count,
            total_approved: eu.approved_count + uk.approved_count,
            eu_projects: eu.projects_count,
            uk_projects: uk.projects_count,
            eu_relevant: eu.relevant_count,
            uk_relevant: uk.relevant_count,
            relevance_rate: relevance_rate(total_relevant, total_projects),
            last_update: self.last_update,
        }
    }
}

/// Combined counters for `/statistics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_projects: usize,
    pub total_relevant: usize,
    pub total_llm_analyzed: usize,
    pub total_approved: usize,
    pub eu_projects: usize,
    pub uk_projects: usize,
    pub eu_relevant: usize,
    pub uk_relevant: usize,
    /// Percent of listings the keyword stage kept, to 2 decimals.
    pub relevance_rate: f64,
    pub last_update: Option<DateTime<Utc>>,
}

/// Percentage rounded to 2 decimals; 0 when there is nothing to divide.
pub fn relevance_rate(relevant: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (relevant as f64 / total as f64 * 10_000.0).round() / 100.0
}

struct ScoutState {
    overall: OverallStatus,
    last_update: Option<DateTime<Utc>>,
    error_message: Option<String>,
    portals: HashMap<Portal, PortalAnalysis>,
}

/// Clears the running flag when an analysis ends.
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ScoutService {
    eu: Arc<Pipeline>,
    uk: Arc<Pipeline>,
    references: Arc<Vec<ReferenceProject>>,
    state: RwLock<ScoutState>,
    running: Arc<AtomicBool>,
}

impl ScoutService {
    pub fn new(eu: Pipeline, uk: Pipeline, references: Vec<ReferenceProject>) -> Self {
        Self {
            eu: Arc::new(eu),
            uk: Arc::new(uk),
            references: Arc::new(references),
            state: RwLock::new(ScoutState {
                overall: OverallStatus::NotStarted,
                last_update: None,
                error_message: None,
                portals: Portal::ALL
                    .into_iter()
                    .map(|portal| (portal, PortalAnalysis::default()))
                    .collect(),
            }),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Wire the real collaborators: HTTP lister and extractor, and a
    /// rate-limited LLM judge.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OpenAIClient::new(config.llm_api_key.expose_secret())
            .with_base_url(&config.llm_base_url)
            .with_timeout(LLM_TIMEOUT)
            .context("Failed to build LLM client")?;
        let judge = Arc::new(RateLimitedJudge::per_minute(
            OpenAIJudge::new(client).with_model(&config.llm_model),
            config.judge_requests_per_minute,
        ));
        let extractor =
            Arc::new(HttpExtractor::with_defaults().context("Failed to build HTTP extractor")?);
        let lister = Arc::new(HtmlLister::with_defaults().context("Failed to build HTTP lister")?);

        let keywords = match &config.keywords_file {
            Some(path) => KeywordTable::load_json(path)
                .with_context(|| format!("Failed to load keywords from {}", path.display()))?,
            None => KeywordTable::default(),
        };
        let references = match &config.references_file {
            Some(path) => ReferenceProject::load_json(path)
                .with_context(|| format!("Failed to load references from {}", path.display()))?,
            None => ReferenceProject::defaults(),
        };

        let pipeline_config = PipelineConfig::new()
            .with_judge_delay(Duration::from_secs(config.judge_delay_secs))
            .with_workers(config.pipeline_workers)
            .with_output_dir(config.output_dir());

        let eu = Pipeline::new(PortalConfig::eu(&config.data_dir), extractor.clone(), judge.clone())
            .with_config(pipeline_config.clone())
            .with_keywords(keywords.clone());
        let uk = Pipeline::new(PortalConfig::uk(&config.data_dir), extractor, judge)
            .with_config(pipeline_config)
            .with_keywords(keywords)
            .with_lister(lister);

        tracing::info!(
            references = references.len(),
            model = %config.llm_model,
            workers = config.pipeline_workers,
            "Scout service configured"
        );
        Ok(Self::new(eu, uk, references))
    }

    pub fn pipeline(&self, portal: Portal) -> &Arc<Pipeline> {
        match portal {
            Portal::Eu => &self.eu,
            Portal::Uk => &self.uk,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> StatusSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let portal = |p: Portal| {
            let mut analysis = state.portals.get(&p).cloned().unwrap_or_default();
            analysis.stage = self.pipeline(p).stage();
            analysis
        };

        StatusSnapshot {
            overall_status: state.overall,
            last_update: state.last_update,
            is_running: self.is_running(),
            error_message: state.error_message.clone(),
            eu_analysis: portal(Portal::Eu),
            uk_analysis: portal(Portal::Uk),
        }
    }

    /// Latest table saved at `checkpoint` by a portal's pipeline.
    pub fn checkpoint(&self, portal: Portal, checkpoint: Checkpoint) -> Option<Table> {
        self.pipeline(portal).checkpoint(checkpoint)
    }

    pub fn checkpoint_files(&self, portal: Portal) -> Vec<CheckpointFile> {
        self.pipeline(portal).checkpoint_files()
    }

    /// Load checkpoint tables saved by an earlier process, so results
    /// survive a restart. Counters of portals that have not run yet are
    /// rebuilt from the restored tables. Returns the tables loaded.
    pub fn restore_saved(&self) -> usize {
        let mut total = 0;
        for portal in Portal::ALL {
            let restored = self.pipeline(portal).restore_checkpoints();
            if restored.is_empty() {
                continue;
            }
            total += restored.len();

            let rows = |checkpoint| self.checkpoint(portal, checkpoint).map_or(0, |t| t.len());
            let (tagged, judged, approved) = (
                rows(Checkpoint::Tagged),
                rows(Checkpoint::Judged),
                rows(Checkpoint::Approved),
            );
            self.update(|state| {
                if let Some(analysis) = state.portals.get_mut(&portal) {
                    if analysis.status == PortalStatus::NotStarted {
                        analysis.status = PortalStatus::Restored;
                        analysis.projects_count = tagged;
                        // Every keyword-relevant listing is judged.
                        analysis.relevant_count = judged;
                        analysis.llm_analyzed_count = judged;
                        analysis.approved_count = approved;
                    }
                }
            });
        }

        if total > 0 {
            tracing::info!(tables = total, "Restored saved analysis results");
        }
        total
    }

    /// Approved rows for `scope`. Combined rows carry a leading `Source`
    /// column; `None` when no portal has approved rows saved yet.
    pub fn approved_table(&self, scope: Scope) -> Option<Table> {
        match scope {
            Scope::Portal(portal) => self.checkpoint(portal, Checkpoint::Approved),
            Scope::Combined => Portal::ALL
                .into_iter()
                .filter_map(|portal| {
                    self.checkpoint(portal, Checkpoint::Approved)
                        .map(|table| table.with_leading_column(SOURCE_COLUMN, portal.source_label()))
                })
                .reduce(|mut combined, table| {
                    combined.extend_from(&table);
                    combined
                }),
        }
    }

    /// Start an analysis of `portals` in the background.
    ///
    /// Fails without starting anything if an analysis is already running.
    pub fn try_start(self: &Arc<Self>, portals: Vec<Portal>) -> Result<(), ScoutError> {
        let guard = self.claim()?;
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = guard;
            this.execute(&portals).await;
        });
        Ok(())
    }

    /// Run an analysis of `portals` to completion.
    pub async fn run_analysis(&self, portals: &[Portal]) -> Result<OverallStatus, ScoutError> {
        let _guard = self.claim()?;
        Ok(self.execute(portals).await)
    }

    fn claim(&self) -> Result<RunGuard, ScoutError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ScoutError::AlreadyRunning)?;
        Ok(RunGuard(Arc::clone(&self.running)))
    }

    async fn execute(&self, portals: &[Portal]) -> OverallStatus {
        tracing::info!(portals = ?portals, "Starting analysis");
        self.update(|state| {
            state.overall = OverallStatus::Running;
            state.error_message = None;
        });

        let mut succeeded = 0;
        let mut errors = Vec::new();
        for &portal in portals {
            self.update(|state| {
                if let Some(analysis) = state.portals.get_mut(&portal) {
                    analysis.status = PortalStatus::Running;
                }
            });

            match self.pipeline(portal).run_portal(&self.references).await {
                Ok(result) => {
                    succeeded += 1;
                    tracing::info!(
                        portal = %portal,
                        listings = result.stats.listings,
                        relevant = result.stats.relevant,
                        approved = result.stats.approved,
                        "Portal analysis complete"
                    );
                    self.update(|state| {
                        if let Some(analysis) = state.portals.get_mut(&portal) {
                            analysis.record(&result);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(portal = %portal, error = %e, "Portal analysis failed");
                    errors.push(format!("{portal}: {e}"));
                    self.update(|state| {
                        if let Some(analysis) = state.portals.get_mut(&portal) {
                            analysis.status = PortalStatus::Failed;
                            analysis.error = Some(e.to_string());
                        }
                    });
                }
            }
        }

        let overall = OverallStatus::from_outcomes(succeeded, portals.len());
        self.update(|state| {
            state.overall = overall;
            state.last_update = Some(Utc::now());
            state.error_message = (!errors.is_empty()).then(|| errors.join("; "));
        });

        match overall {
            OverallStatus::Completed => tracing::info!("Analysis completed"),
            OverallStatus::PartialSuccess => tracing::warn!("Analysis completed with failures"),
            _ => tracing::error!("Analysis failed"),
        }
        overall
    }

    fn update(&self, f: impl FnOnce(&mut ScoutState)) {
        f(&mut self.state.write().unwrap_or_else(PoisonError::into_inner));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funding_pipeline::{InputSource, MockExtractor, MockJudge};

    const EU_INPUT: &str = "Title: Deeptech incubation call\n\
        Link: https://ec.europa.eu/topic/1\n\
        Status: Open\n\
        Start_date: 01 January 2025\n\
        Deadline: 01 March 2025\n\
        Title: Road maintenance\n\
        Link: https://ec.europa.eu/topic/2\n\
        Status: Open\n\
        Start_date: None\n\
        Deadline: None\n";

    fn pipeline(portal: PortalConfig, judge: Arc<MockJudge>) -> Pipeline {
        Pipeline::new(portal, Arc::new(MockExtractor::new().with_default("text")), judge)
            .with_config(PipelineConfig::new().with_judge_delay(Duration::ZERO))
    }

    fn service(uk_sources: Vec<InputSource>) -> ScoutService {
        let judge = Arc::new(MockJudge::new().with_default("Pertinence : Oui\nRésumé : Fit."));
        let eu = PortalConfig::new("eu", "européen").with_source(InputSource::Inline(EU_INPUT.into()));
        let uk = PortalConfig::new("uk", "britannique").with_sources(uk_sources);
        ScoutService::new(
            pipeline(eu, judge.clone()),
            pipeline(uk, judge),
            ReferenceProject::defaults(),
        )
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("eu".parse::<Scope>().unwrap(), Scope::Portal(Portal::Eu));
        assert_eq!("UK".parse::<Scope>().unwrap(), Scope::Portal(Portal::Uk));
        assert_eq!("combined".parse::<Scope>().unwrap(), Scope::Combined);
        assert!("fr".parse::<Scope>().is_err());
        assert!("combined".parse::<Portal>().is_err());
    }

    #[test]
    fn test_relevance_rate() {
        assert_eq!(relevance_rate(0, 0), 0.0);
        assert_eq!(relevance_rate(1, 3), 33.33);
        assert_eq!(relevance_rate(2, 3), 66.67);
        assert_eq!(relevance_rate(5, 5), 100.0);
    }

    #[test]
    fn test_overall_status_from_outcomes() {
        assert_eq!(OverallStatus::from_outcomes(2, 2), OverallStatus::Completed);
        assert_eq!(OverallStatus::from_outcomes(1, 2), OverallStatus::PartialSuccess);
        assert_eq!(OverallStatus::from_outcomes(0, 2), OverallStatus::Failed);
    }

    #[test]
    fn test_initial_status() {
        let status = service(vec![]).status();
        assert_eq!(status.overall_status, OverallStatus::NotStarted);
        assert_eq!(status.eu_analysis.status, PortalStatus::NotStarted);
        assert!(status.last_update.is_none());
        assert!(!status.is_running);
    }

    #[tokio::test]
    async fn test_partial_success_when_one_portal_has_no_input() {
        let scout = service(vec![]);

        let overall = scout.run_analysis(&Portal::ALL).await.unwrap();
        assert_eq!(overall, OverallStatus::PartialSuccess);

        let status = scout.status();
        assert_eq!(status.eu_analysis.status, PortalStatus::Completed);
        assert_eq!(status.eu_analysis.projects_count, 2);
        assert_eq!(status.eu_analysis.relevant_count, 1);
        assert_eq!(status.eu_analysis.llm_analyzed_count, 1);
        assert_eq!(status.eu_analysis.approved_count, 1);
        assert_eq!(status.eu_analysis.stage, RunStage::Done);
        assert_eq!(status.uk_analysis.status, PortalStatus::Failed);
        assert!(status.uk_analysis.error.is_some());
        assert!(status.error_message.unwrap().starts_with("uk:"));
        assert!(status.last_update.is_some());

        let stats = scout.status().statistics();
        assert_eq!(stats.total_projects, 2);
        assert_eq!(stats.relevance_rate, 50.0);
    }

    #[tokio::test]
    async fn test_combined_table_tags_source() {
        let uk_csv = "title,url,status\nUKRI incubation fund,https://ukri.org/opp/1,Open\n";
        let scout = service(vec![InputSource::Inline(String::new())]);
        assert!(scout.approved_table(Scope::Combined).is_none());

        scout.run_analysis(&[Portal::Eu]).await.unwrap();
        let combined = scout.approved_table(Scope::Combined).unwrap();
        assert_eq!(combined.columns[0], SOURCE_COLUMN);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined.rows[0][0], "EU");

        // Inline sources are fixed-field text, so swap in a pipeline fed by CSV
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uk.csv");
        std::fs::write(&path, uk_csv).unwrap();
        let judge = Arc::new(MockJudge::new().with_default("Pertinence : Oui\nRésumé : Fit."));
        let scout = ScoutService::new(
            pipeline(
                PortalConfig::new("eu", "européen").with_source(InputSource::Inline(EU_INPUT.into())),
                judge.clone(),
            ),
            pipeline(
                PortalConfig::new("uk", "britannique").with_source(InputSource::TabularFile(path)),
                judge,
            ),
            ReferenceProject::defaults(),
        );
        assert_eq!(
            scout.run_analysis(&Portal::ALL).await.unwrap(),
            OverallStatus::Completed
        );

        let combined = scout.approved_table(Scope::Combined).unwrap();
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.rows[0][0], "EU");
        assert_eq!(combined.rows[1][0], "UK");
        assert_eq!(combined.rows[1][2], "https://ukri.org/opp/1");
    }

    #[tokio::test]
    async fn test_restore_saved_rebuilds_counters() {
        let dir = tempfile::tempdir().unwrap();
        let judge = Arc::new(MockJudge::new().with_default("Pertinence : Oui\nRésumé : Fit."));
        let build = || {
            let config = PipelineConfig::new()
                .with_judge_delay(Duration::ZERO)
                .with_output_dir(dir.path());
            let eu = PortalConfig::new("eu", "européen")
                .with_checkpoint_stem("eu")
                .with_source(InputSource::Inline(EU_INPUT.into()));
            let uk = PortalConfig::new("uk", "britannique").with_checkpoint_stem("uk");
            let extractor = Arc::new(MockExtractor::new().with_default("text"));
            ScoutService::new(
                Pipeline::new(eu, extractor.clone(), judge.clone()).with_config(config.clone()),
                Pipeline::new(uk, extractor, judge.clone()).with_config(config),
                ReferenceProject::defaults(),
            )
        };

        build().run_analysis(&[Portal::Eu]).await.unwrap();

        let restarted = build();
        assert!(restarted.approved_table(Scope::Portal(Portal::Eu)).is_none());
        assert_eq!(restarted.restore_saved(), 3);

        let status = restarted.status();
        assert_eq!(status.eu_analysis.status, PortalStatus::Restored);
        assert_eq!(status.eu_analysis.projects_count, 2);
        assert_eq!(status.eu_analysis.relevant_count, 1);
        assert_eq!(status.eu_analysis.approved_count, 1);
        assert_eq!(status.uk_analysis.status, PortalStatus::NotStarted);
        assert_eq!(restarted.approved_table(Scope::Portal(Portal::Eu)).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_start_is_rejected_while_running() {
        let judge = Arc::new(
            MockJudge::new()
                .with_default("Pertinence : Non")
                .with_delay(Duration::from_millis(200)),
        );
        let eu = PortalConfig::new("eu", "européen").with_source(InputSource::Inline(EU_INPUT.into()));
        let uk = PortalConfig::new("uk", "britannique");
        let scout = Arc::new(ScoutService::new(
            pipeline(eu, judge.clone()),
            pipeline(uk, judge),
            ReferenceProject::defaults(),
        ));

        scout.try_start(vec![Portal::Eu]).unwrap();
        assert!(scout.is_running());
        assert!(matches!(
            scout.try_start(vec![Portal::Eu]),
            Err(ScoutError::AlreadyRunning)
        ));

        while scout.is_running() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(scout.status().overall_status, OverallStatus::Completed);
    }
}
