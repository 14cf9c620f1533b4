//! hotel-booking server entry point.
//!
//! Opens the database, seeds sample hotels on first run, and starts the
//! Axum HTTP server (plus an optional metrics-only listener).

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use hotel_booking::api;
use hotel_booking::app_state::AppState;
use hotel_booking::config::BookingConfig;
use hotel_booking::metrics::BookingMetrics;
use hotel_booking::persistence::SqlitePersistence;
use hotel_booking::service::BookingService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = BookingConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        addr = %config.listen_addr,
        db = %config.database_path,
        "starting hotel-booking"
    );

    // Build persistence layer
    let store = SqlitePersistence::connect(
        &config.database_path,
        config.database_max_connections,
        config.database_connect_timeout(),
    )
    .await
    .context("failed to open database")?;

    if config.seed_sample_data {
        store
            .seed_if_empty()
            .await
            .context("failed to seed sample data")?;
    }

    // Build service layer
    let metrics = Arc::new(BookingMetrics::new().context("failed to build metrics registry")?);
    let booking_service = BookingService::new(store, metrics);

    // Build application state
    let app_state = AppState::new(booking_service);

    if let Some(metrics_addr) = config.metrics_listen_addr {
        let metrics_app = api::build_metrics_router(app_state.clone());
        let listener = tokio::net::TcpListener::bind(metrics_addr)
            .await
            .with_context(|| format!("failed to bind metrics listener on {metrics_addr}"))?;
        tracing::info!(addr = %metrics_addr, "metrics listener started");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app)
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                tracing::error!(error = %e, "metrics listener stopped");
            }
        });
    }

    // Build router
    let app = api::build_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
