// Main entry point for the Funding Scout API server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use server_core::kernel::{run_on_startup, start_scheduler, ScoutService};
use server_core::server::{build_app, AppState};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,funding_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Funding Scout API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(data_dir = %config.data_dir.display(), "Configuration loaded");

    let scout =
        Arc::new(ScoutService::from_config(&config).context("Failed to build scout service")?);

    // Serve the last saved results until a new run replaces them
    scout.restore_saved();

    // Scheduled analysis; the handle must outlive the server
    let interval = Duration::from_secs(config.update_interval_hours.max(1) * 3600);
    let _scheduler = start_scheduler(scout.clone(), interval)
        .await
        .context("Failed to start scheduler")?;

    if config.run_on_startup {
        run_on_startup(&scout);
    }

    // Build application
    let app = build_app(AppState::new(scout, config.update_interval_hours));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
