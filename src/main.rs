//! Inbound Server: reverse share invites with malware-gated uploads.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use inbound_api::{AppState, build_app};
use inbound_core::config::AppConfig;
use inbound_core::error::AppError;
use inbound_database::Stores;
use inbound_database::migration::run_migrations;
use inbound_scanner::ScanGateway;
use inbound_worker::jobs::{LogMailTransport, SendEmailJobHandler};
use inbound_worker::{JobExecutor, JobQueue, WorkerRunner};

#[tokio::main]
async fn main() {
    let env = std::env::var("INBOUND_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Inbound");

    // ── Step 1: Data directories ─────────────────────────────────
    create_data_directories(&config).await?;

    // ── Step 2: Stores + migrations ──────────────────────────────
    let stores = Stores::connect(&config.database).await?;
    if let Some(pool) = stores.pool() {
        tracing::info!("Running database migrations");
        run_migrations(pool).await?;
    }

    // ── Step 3: Scanner ──────────────────────────────────────────
    let scanner = Arc::new(ScanGateway::new(&config.scanner, config.storage.root())?);
    if !scanner.is_configured() {
        tracing::warn!("Scanner URL not configured, uploads will not be scanned");
    }

    // ── Step 4: Job queue ────────────────────────────────────────
    let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
    let job_queue = Arc::new(JobQueue::new(
        Arc::clone(&stores.jobs),
        worker_id,
        config.worker.max_attempts,
    ));

    // ── Step 5: Shutdown channel & worker ────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = if config.worker.enabled {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(SendEmailJobHandler::new(
            Arc::new(LogMailTransport),
            &config.mail,
        )));

        let runner = WorkerRunner::new(
            Arc::clone(&job_queue),
            Arc::new(executor),
            config.worker.clone(),
        );
        let cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move { runner.run(cancel).await }))
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 6: HTTP server ──────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, stores.clone(), scanner, job_queue);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Inbound server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 7: Drain ────────────────────────────────────────────
    if let Some(handle) = worker_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Worker did not stop within the grace period");
        }
    }

    if let Some(pool) = stores.pool() {
        pool.close().await;
    }

    tracing::info!("Inbound server stopped");
    Ok(())
}

async fn create_data_directories(config: &AppConfig) -> Result<(), AppError> {
    let root = config.storage.root();
    for dir in [root.join("temp"), root.join("reverse-shares")] {
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::internal(format!("Failed to create dir '{}': {e}", dir.display()))
        })?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
