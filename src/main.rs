//! Courtside server: sports facility bookings, classes, and clubs.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use courtside_auth::session::LogAlertSink;
use courtside_core::config::{AppConfig, StoreBackend};
use courtside_core::error::AppError;
use courtside_database::{DatabasePool, StoreSet};
use courtside_service::{MockGateway, ServiceRegistry};
use courtside_worker::{JobExecutor, WorkerRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `COURTSIDE_ENV` overlay, then
/// `COURTSIDE__*` environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("COURTSIDE_ENV").unwrap_or_else(|_| "development".to_string());
    let dir = std::env::var("COURTSIDE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    AppConfig::load_from(&dir, &env)
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
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Courtside");

    // ── Step 1: Stores + migrations ──────────────────────────────
    let stores = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                courtside_database::migration::run_migrations(pool.pool()).await?;
                tracing::info!("Database migrations complete");
            }
            StoreSet::postgres(pool)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores; all data is lost on shutdown");
            StoreSet::in_memory()
        }
    };

    // ── Step 2: Auth, gateway, services ──────────────────────────
    let gateway = Arc::new(MockGateway::new(config.payments.mock_decline));
    let services = ServiceRegistry::build(&config, stores, gateway, Arc::new(LogAlertSink));
    tracing::info!("Services initialized");

    // ── Step 3: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: Background worker ────────────────────────────────
    let worker_handle = if config.worker.enabled {
        let executor = Arc::new(JobExecutor::with_default_jobs(&services));
        let runner = WorkerRunner::new(executor, config.worker.clone());
        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = runner.run(worker_cancel).await {
                tracing::error!(error = %e, "Worker stopped with error");
            }
        });
        tracing::info!("Background worker started");
        Some(handle)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app = courtside_api::build_router(courtside_api::AppState::new(services.clone()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, "Courtside listening");

    // ── Step 6: Graceful shutdown ────────────────────────────────
    axum_serve(listener, app, shutdown_tx).await?;

    tracing::info!("Waiting for background tasks to complete...");
    if let Some(handle) = worker_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Worker did not stop within the grace period");
        }
    }
    if let Some(pool) = &services.stores.pool {
        pool.close().await;
    }

    tracing::info!("Courtside shut down gracefully");
    Ok(())
}

async fn axum_serve(
    listener: tokio::net::TcpListener,
    app: axum::Router,
    shutdown_tx: watch::Sender<bool>,
) -> Result<(), AppError> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

/// Wait for Ctrl+C or SIGTERM. A handler that fails to install is logged
/// and treated as never firing.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
