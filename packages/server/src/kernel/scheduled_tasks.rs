//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (every UPDATE_INTERVAL_HOURS)
//!     │
//!     └─► ScoutService::run_analysis(EU, UK)
//!             └─► Pipeline::run_portal per portal, one after the other
//! ```
//!
//! A tick that lands while a manual run is in progress is skipped.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use super::scout::{Portal, ScoutError, ScoutService};

/// Start the periodic full analysis.
pub async fn start_scheduler(scout: Arc<ScoutService>, interval: Duration) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job_scout = scout.clone();
    let analysis_job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let scout = job_scout.clone();
        Box::pin(async move {
            run_scheduled_analysis(&scout).await;
        })
    })?;

    scheduler.add(analysis_job).await?;
    scheduler.start().await?;

    tracing::info!(
        interval_hours = interval.as_secs() / 3600,
        "Scheduled tasks started (full analysis)"
    );
    Ok(scheduler)
}

/// Kick off a full analysis right away without waiting for the first tick.
pub fn run_on_startup(scout: &Arc<ScoutService>) {
    match scout.try_start(Portal::ALL.to_vec()) {
        Ok(()) => tracing::info!("Startup analysis started"),
        Err(ScoutError::AlreadyRunning) => {
            tracing::warn!("Analysis already running, skipping startup run")
        }
    }
}

async fn run_scheduled_analysis(scout: &ScoutService) {
    tracing::info!("Running scheduled analysis");

    match scout.run_analysis(&Portal::ALL).await {
        Ok(status) => tracing::info!(status = ?status, "Scheduled analysis finished"),
        Err(ScoutError::AlreadyRunning) => {
            tracing::warn!("Analysis already running, skipping this execution")
        }
    }
}
