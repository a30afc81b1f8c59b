use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use report_assistant_api::app::{create_app, AppState};
use report_assistant_api::config::Config;
use report_assistant_api::jobs::{JobScheduler, PoolMetricsJob, SessionSweepJob, ThrottlePruneJob};
use report_assistant_api::middleware::{init_metrics, logging::init_logging};
use report_assistant_api::services::{EmailNotifier, GeminiClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // A missing generation key is fatal here, before anything listens.
    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;
    init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting Report Assistant API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&(&config.database).into()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let generator = Arc::new(GeminiClient::new(&config.generation)?);
    let notifier = Arc::new(EmailNotifier::new(config.email.clone()));
    if config.email.provider == "smtp" && !config.email.has_credentials() {
        info!("SMTP credentials not set, finalized reports will not be emailed");
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(config, pool.clone(), generator, notifier);

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool));
    scheduler.register(SessionSweepJob::new(Arc::clone(&state.sessions)));
    if let Some(throttle) = &state.login_throttle {
        scheduler.register(ThrottlePruneJob::new(Arc::clone(throttle)));
    }
    scheduler.start();

    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(5)).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
