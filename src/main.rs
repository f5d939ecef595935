//! Catalog Server - entry point
//!
//! Opens both stores, serves the catalog routes and closes the stores again
//! once a shutdown signal has drained the server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_server::store::{DocumentStore, SqliteItemStore};
use catalog_server::util::time::init_server_time;
use catalog_server::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config);

    // Initialize server time tracking
    init_server_time();

    info!("Starting Catalog Server");
    info!("Server address: {}", config.server_addr);

    let items = Arc::new(
        SqliteItemStore::connect(&config.database_url, config.database_max_connections)
            .await
            .context("Failed to open relational item store")?,
    );
    let products = Arc::new(
        DocumentStore::open(&config.document_store_path)
            .await
            .context("Failed to open document store")?,
    );

    // Create application state
    let state = AppState::new(config.clone(), items.clone(), products.clone());

    // Build router
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server_addr;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    items.close().await;
    if let Err(e) = products.close().await {
        error!(error = %e, "Failed to compact document store");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over `LOG_LEVEL`
fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let json = config.log_json.then(|| fmt::layer().json().with_current_span(false));
    let text = (!config.log_json).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(text)
        .init();
}

/// Resolve once Ctrl+C or SIGTERM arrives, letting in-flight requests finish
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = interrupt => "interrupt",
        _ = terminate => "terminate",
    };
    info!(signal, "Shutting down, draining connections before closing stores");
}
