//! Standalone server binary.
//!
//! Serves the seed catalog on the default address; use the `moviedb` CLI
//! for other addresses or data files.

use anyhow::Result;
use tracing::info;

use server::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,server=debug,catalog=debug")
            }),
        )
        .init();

    let config = ServerConfig::default();
    info!("Starting movie catalog server with {:?}", config);

    server::serve(config).await
}
