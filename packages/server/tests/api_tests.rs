//! Route tests against the full router, driven with `oneshot`.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use funding_pipeline::MockJudge;
use server_core::kernel::{OverallStatus, Portal};

use crate::common::{TestApp, YES};

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::builder().build();

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["is_running"], false);
}

#[tokio::test]
async fn home_lists_endpoints() {
    let app = TestApp::builder().build();

    let (status, body) = app.get_json("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "not_started");
    assert!(body["endpoints"]["/statistics"].is_string());
}

#[tokio::test]
async fn status_before_any_run() {
    let app = TestApp::builder().build();

    let (status, body) = app.get_json("/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall_status"], "not_started");
    assert_eq!(body["is_running"], false);
    assert!(body["last_update"].is_null());
    assert_eq!(body["next_scheduled_run"], "Every 24 hours");
    assert_eq!(body["eu_analysis"]["status"], "not_started");
    assert_eq!(body["uk_analysis"]["stage"], "idle");
}

#[tokio::test]
async fn analysis_is_not_found_before_any_run() {
    let app = TestApp::builder().build();

    let (status, body) = app.get_json("/analysis/eu").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No eu analysis data available");

    let (status, _) = app.get_json("/analysis/combined").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_analysis_type_is_bad_request() {
    let app = TestApp::builder().build();

    let (status, body) = app.get_json("/analysis/fr").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("fr"));
}

#[tokio::test]
async fn portal_analysis_serves_all_checkpoints() {
    let app = TestApp::builder().build();
    app.scout.run_analysis(&Portal::ALL).await.unwrap();

    let (status, body) = app.get_json("/analysis/eu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["statistics"]["projects_count"], 3);
    assert_eq!(body["statistics"]["relevant_count"], 2);
    assert_eq!(body["statistics"]["llm_analyzed_count"], 2);
    assert_eq!(body["statistics"]["approved_count"], 1);

    let results = &body["results"];
    assert_eq!(results["tagged"]["count"], 3);
    assert_eq!(results["judged"]["count"], 2);
    assert_eq!(results["approved"]["count"], 1);

    let approved = &results["approved"]["data"][0];
    assert_eq!(approved["Title"], "Deeptech incubation call");
    assert_eq!(approved["Pertinence LLM"], "Oui");
    assert_eq!(approved["Résumé LLM"], "Proche de FACTORIAT.");
    assert_eq!(approved["Matching Word(s)"], "deeptech, incubation");

    let road = &results["tagged"]["data"][1];
    assert_eq!(road["Pertinence"], "No");
    assert_eq!(road["Start_date"], "");
}

#[tokio::test]
async fn combined_analysis_tags_source_portal() {
    let app = TestApp::builder().build();
    app.scout.run_analysis(&Portal::ALL).await.unwrap();

    let (status, body) = app.get_json("/analysis/combined").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_eu_opportunities"], 1);
    assert_eq!(body["summary"]["total_uk_opportunities"], 1);
    assert_eq!(body["summary"]["total_opportunities"], 2);

    let rows = body["results"]["data"].as_array().unwrap();
    assert_eq!(rows[0]["Source"], "EU");
    assert_eq!(rows[1]["Source"], "UK");
    assert_eq!(rows[1]["Link"], "https://www.ukri.org/opportunity/1");
    assert_eq!(body["results"]["columns"][0], "Source");
}

#[tokio::test]
async fn statistics_report_relevance_rate() {
    let app = TestApp::builder().build();
    app.scout.run_analysis(&Portal::ALL).await.unwrap();

    let (status, body) = app.get_json("/statistics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let stats = &body["statistics"];
    assert_eq!(stats["total_projects"], 5);
    assert_eq!(stats["total_relevant"], 3);
    assert_eq!(stats["total_llm_analyzed"], 3);
    assert_eq!(stats["total_approved"], 2);
    assert_eq!(stats["relevance_rate"], 60.0);
    assert_eq!(body["detailed_stats"]["uk_analysis"]["projects_count"], 2);
}

#[tokio::test]
async fn statistics_rate_is_zero_without_listings() {
    let app = TestApp::builder().build();

    let (_, body) = app.get_json("/statistics").await;
    assert_eq!(body["statistics"]["relevance_rate"], 0.0);
}

#[tokio::test]
async fn missing_uk_input_is_partial_success() {
    let app = TestApp::builder().without_uk_input().build();
    let overall = app.scout.run_analysis(&Portal::ALL).await.unwrap();
    assert_eq!(overall, OverallStatus::PartialSuccess);

    let (_, body) = app.get_json("/status").await;
    assert_eq!(body["overall_status"], "partial_success");
    assert_eq!(body["eu_analysis"]["status"], "completed");
    assert_eq!(body["uk_analysis"]["status"], "failed");
    assert_eq!(body["uk_analysis"]["stage"], "failed");
    assert!(body["uk_analysis"]["error"]
        .as_str()
        .unwrap()
        .contains("no input data"));
}

#[tokio::test]
async fn trigger_runs_in_background() {
    let app = TestApp::builder().build();

    let (status, body) = app.post("/trigger/eu").await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "started");
    assert_eq!(body["portals"], serde_json::json!(["eu"]));

    app.wait_idle().await;

    let (_, status_body) = app.get_json("/status").await;
    assert_eq!(status_body["overall_status"], "completed");
    assert_eq!(status_body["eu_analysis"]["approved_count"], 1);
    assert_eq!(status_body["uk_analysis"]["status"], "not_started");
}

#[tokio::test]
async fn trigger_while_running_is_conflict() {
    let app = TestApp::builder()
        .judge(
            MockJudge::new()
                .with_default(YES)
                .with_delay(Duration::from_millis(300)),
        )
        .build();

    let (status, _) = app.post("/trigger").await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = app.post("/trigger/uk").await;
    assert_eq!(status, StatusCode::CONFLICT);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "analysis already running");

    let (_, health) = app.get_json("/health").await;
    assert_eq!(health["is_running"], true);

    app.wait_idle().await;
    let (status, _) = app.post("/trigger/uk").await;
    assert_eq!(status, StatusCode::ACCEPTED);
    app.wait_idle().await;
}

#[tokio::test]
async fn trigger_unknown_portal_is_bad_request() {
    let app = TestApp::builder().build();

    let (status, _) = app.post("/trigger/fr").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!app.scout.is_running());
}

#[tokio::test]
async fn export_csv_download() {
    let app = TestApp::builder().build();
    app.scout.run_analysis(&Portal::ALL).await.unwrap();

    let response = app.get("/export/eu/csv").await;
    assert_eq!(response.0, StatusCode::OK);

    let csv = String::from_utf8(response.1).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Title,Link,Status"));
    assert!(lines.next().unwrap().starts_with("Deeptech incubation call,"));
    assert!(!csv.contains("Road maintenance"));
}

#[tokio::test]
async fn export_combined_json_download() {
    let app = TestApp::builder().build();
    app.scout.run_analysis(&Portal::ALL).await.unwrap();

    let (status, body) = app.get_json("/export/combined/json").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Source"], "EU");
    assert_eq!(rows[1]["Title"], "UKRI entrepreneurship fund");
}

#[tokio::test]
async fn export_rejects_unknown_format_and_type() {
    let app = TestApp::builder().build();
    app.scout.run_analysis(&Portal::ALL).await.unwrap();

    let (status, body) = app.get_json("/export/eu/excel").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("csv, json"));

    let (status, _) = app.get_json("/export/fr/csv").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_before_any_run_is_not_found() {
    let app = TestApp::builder().build();

    let (status, _) = app.get_json("/export/uk/json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn files_lists_checkpoints_per_portal() {
    let out = tempfile::tempdir().unwrap();
    let app = TestApp::builder().output_dir(out.path()).build();

    let (status, body) = app.get_json("/files").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["files"]["eu"][0]["filename"], "eu_tagged.csv");
    assert_eq!(body["files"]["eu"][0]["exists"], false);
    assert!(body["files"]["eu"][0]["size_bytes"].is_null());

    app.scout.run_analysis(&[Portal::Eu]).await.unwrap();

    let (_, body) = app.get_json("/files").await;
    let eu = body["files"]["eu"].as_array().unwrap();
    assert_eq!(eu.len(), 6);
    assert!(eu.iter().all(|file| file["exists"] == true));
    assert!(eu[0]["size_bytes"].as_u64().unwrap() > 0);
    assert!(eu[0]["last_modified"].is_string());
    assert_eq!(body["files"]["uk"][5]["filename"], "uk_approved.json");
    assert_eq!(body["files"]["uk"][5]["exists"], false);
}

#[tokio::test]
async fn saved_results_are_served_after_restart() {
    let out = tempfile::tempdir().unwrap();
    let first = TestApp::builder().output_dir(out.path()).build();
    first.scout.run_analysis(&Portal::ALL).await.unwrap();

    let restarted = TestApp::builder().output_dir(out.path()).build();
    let (status, _) = restarted.get_json("/analysis/eu").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(restarted.scout.restore_saved(), 6);

    let (status, body) = restarted.get_json("/analysis/eu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "restored");
    assert_eq!(body["statistics"]["approved_count"], 1);
    assert_eq!(body["results"]["approved"]["data"][0]["Title"], "Deeptech incubation call");

    let (status, body) = restarted.get_json("/export/combined/json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}
