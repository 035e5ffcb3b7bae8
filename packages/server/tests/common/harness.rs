//! Test harness: an app over mock-backed pipelines.
//!
//! No network or LLM calls: listings come from inline fixed-field text and
//! a temp CSV, the judge and extractor are mocks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use funding_pipeline::{
    InputSource, MockExtractor, MockJudge, Pipeline, PipelineConfig, PortalConfig,
    ReferenceProject,
};
use serde_json::Value;
use server_core::kernel::ScoutService;
use server_core::server::{build_app, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

pub const EU_INPUT: &str = "Title: Deeptech incubation call\n\
    Link: https://ec.europa.eu/topic/1\n\
    Status: Open\n\
    Start_date: 01 January 2025\n\
    Deadline: 01 March 2025\n\
    Title: Road maintenance\n\
    Link: https://ec.europa.eu/topic/2\n\
    Status: Open\n\
    Start_date: None\n\
    Deadline: None\n\
    Title: Machine learning for hospitals\n\
    Link: https://ec.europa.eu/topic/3\n\
    Status: Forthcoming\n\
    Start_date: 01 June 2025\n\
    Deadline: 01 September 2025\n";

pub const UK_CSV: &str = "Title,Link,Status,Opening date,Closing date\n\
    UKRI entrepreneurship fund,https://www.ukri.org/opportunity/1,Open,1 May 2025,1 July 2025\n\
    Fisheries survey,https://www.ukri.org/opportunity/2,Open,,\n";

pub const YES: &str = "Pertinence : Oui\nRésumé : Proche de FACTORIAT.";

/// Extracted page text per listing; the judge keys its answers on these.
pub const PAGES: [(&str, &str); 3] = [
    ("https://ec.europa.eu/topic/1", "Grants for deeptech incubators across member states."),
    ("https://ec.europa.eu/topic/3", "Clinical AI pilots in public hospitals."),
    ("https://www.ukri.org/opportunity/1", "Seed grants for university spinouts."),
];

/// An app plus the handles tests poke at.
pub struct TestApp {
    pub router: Router,
    pub scout: Arc<ScoutService>,
    _dir: TempDir,
}

pub struct TestAppBuilder {
    judge: MockJudge,
    uk_has_input: bool,
    output_dir: Option<PathBuf>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        TestAppBuilder {
            judge: MockJudge::new()
                .with_answer("deeptech incubators", YES)
                .with_answer("university spinouts", YES),
            uk_has_input: true,
            output_dir: None,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        self.send(Method::GET, uri).await
    }

    pub async fn post(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        self.send(Method::POST, uri).await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    pub async fn send(&self, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    /// Wait for a background analysis to finish.
    pub async fn wait_idle(&self) {
        for _ in 0..250 {
            if !self.scout.is_running() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("analysis still running");
    }
}

impl TestAppBuilder {
    pub fn judge(mut self, judge: MockJudge) -> Self {
        self.judge = judge;
        self
    }

    /// Leave the UK portal without any input source.
    pub fn without_uk_input(mut self) -> Self {
        self.uk_has_input = false;
        self
    }

    /// Write checkpoint files under `dir`.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("projets_UKRI_full.csv");
        std::fs::write(&csv_path, UK_CSV).unwrap();

        let judge = Arc::new(self.judge);
        let extractor = Arc::new(
            PAGES
                .iter()
                .fold(MockExtractor::new().with_default("Call description."), |m, (url, text)| {
                    m.with_text(*url, *text)
                }),
        );
        let mut config = PipelineConfig::new().with_judge_delay(Duration::ZERO);
        if let Some(output_dir) = self.output_dir {
            config = config.with_output_dir(output_dir);
        }

        let eu = Pipeline::new(
            PortalConfig::new("eu", "européen").with_source(InputSource::Inline(EU_INPUT.into())),
            extractor.clone(),
            judge.clone(),
        )
        .with_config(config.clone());

        let mut uk_portal = PortalConfig::new("uk", "britannique (UKRI)");
        if self.uk_has_input {
            uk_portal = uk_portal.with_source(InputSource::TabularFile(csv_path));
        }
        let uk = Pipeline::new(uk_portal, extractor, judge).with_config(config);

        let scout = Arc::new(ScoutService::new(eu, uk, ReferenceProject::defaults()));
        let router = build_app(AppState::new(scout.clone(), 24));

        TestApp {
            router,
            scout,
            _dir: dir,
        }
    }
}
