//! Mausam weather service
//!
//! This binary coordinates:
//! - Periodic polling of current weather for the configured cities
//! - Persisting readings to the store
//! - Serving daily summaries, alerts and thresholds over HTTP

mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use mausam_config::{AppConfig, ProviderKind};
use mausam_poller::{Poller, Scheduler};
use mausam_source::{build_source, OpenWeatherConfig, SourceKind};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use crate::store::StoreHandle;

#[tokio::main]
async fn main() -> Result<()> {
    mausam_obs::init("mausamd");

    info!("Starting mausam weather service");

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // Shared handles, passed explicitly to the poller and the API
    let store = StoreHandle::open(&config).await?;
    let source = build_source(source_kind(&config)).context("Failed to build weather source")?;
    let backends = store.backends(source);

    let poller = Poller::new(backends.source.clone(), backends.readings.clone())
        .with_fetch_timeout(Duration::from_secs(config.fetch_timeout_secs()));
    let scheduler = Scheduler::new(
        Arc::new(poller),
        Duration::from_secs(config.poll_interval_secs()),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));

    // Start HTTP server
    let (app, state) = mausam_api::build_app(backends)?;
    let addr: SocketAddr = config
        .http_bind()
        .parse()
        .context("Invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    mausam_api::set_ready(&state, true);
    info!(%addr, "HTTP server listening");

    let shutdown_state = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            mausam_api::set_ready(&shutdown_state, false);
            let _ = shutdown_tx.send(true);
        })
        .await
        .context("server error")?;

    // Let an in-flight poll cycle finish before closing the store
    match scheduler_task.await {
        Ok(cycles) => info!(cycles, "Poller finished"),
        Err(e) => error!("Poller task failed: {}", e),
    }
    store.close().await;

    info!("Mausam stopped");
    Ok(())
}

fn source_kind(config: &AppConfig) -> SourceKind {
    match config.provider_kind() {
        ProviderKind::Simulator => SourceKind::Simulator,
        ProviderKind::OpenWeather => SourceKind::OpenWeather(OpenWeatherConfig {
            api_key: config.api_key().unwrap_or_default().to_string(),
            base_url: config.provider_base_url(),
            timeout_secs: config.provider_timeout_secs(),
        }),
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
