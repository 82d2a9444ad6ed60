//! Suitter session server.
//!
//! Wires the session store, its background sweeper and the HTTP router
//! together and runs until Ctrl-C.

use std::time::Duration;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use suitter_core::config::AppConfig;
use suitter_core::error::AppError;
use suitter_session::{SessionManager, SessionSweeper};
use suitter_web::{AppState, build_router};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SUITTER_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
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
    tracing::info!("Starting Suitter v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Session store ────────────────────────────────────
    let sessions = SessionManager::new(&config.session);
    tracing::info!(
        cookie = %config.session.cookie_name,
        max_age_seconds = config.session.max_age_seconds,
        "Session store initialized"
    );

    // ── Step 2: Expired-session sweeper ──────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = SessionSweeper::new(sessions.clone(), config.session.sweep_interval())
        .spawn(shutdown_rx);

    // ── Step 3: HTTP server ──────────────────────────────────────
    let router = build_router(AppState::new(sessions));
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {}", e)))?;

    // ── Step 4: Stop background work ─────────────────────────────
    let _ = shutdown_tx.send(true);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    match tokio::time::timeout(grace, sweeper).await {
        Ok(Ok(())) => tracing::info!("Session sweeper stopped"),
        Ok(Err(e)) => tracing::error!("Session sweeper task failed: {}", e),
        Err(_) => tracing::warn!("Session sweeper did not stop within {}s", grace.as_secs()),
    }

    tracing::info!("Suitter shut down");
    Ok(())
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
