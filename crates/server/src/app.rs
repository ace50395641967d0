//! Loading the catalog and serving the router.

use std::sync::Arc;

use anyhow::{Context, Result};
use catalog::MovieCatalog;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::routes::{create_router, AppState};

/// Load the seed file, bind the listener and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> Result<()> {
    let catalog = MovieCatalog::load_from_file(&config.data_file)
        .with_context(|| format!("Failed to load catalog from {}", config.data_file.display()))?;
    serve_catalog(Arc::new(catalog), &config).await
}

/// Serve an already loaded catalog
pub async fn serve_catalog(catalog: Arc<MovieCatalog>, config: &ServerConfig) -> Result<()> {
    let router = create_router(AppState::new(catalog));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
