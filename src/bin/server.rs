//! Search service binary.
//!
//! Usage: `helix-server [CONFIG_PATH]`. Without an argument the path comes
//! from `HELIX_CONFIG`, then `~/.config/helix/config.toml`. A missing file
//! means defaults.

use std::path::PathBuf;
use std::sync::Arc;

use helix::{HelixConfig, SearchServer};
use helix_search::Aggregator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("HELIX_CONFIG"))
        .map(PathBuf::from)
        .unwrap_or_else(HelixConfig::default_config_path);

    let config = HelixConfig::load_or_default(&path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?;

    let aggregator = Arc::new(Aggregator::new(config.search.clone())?);
    let server = SearchServer::start(&config.server, aggregator).await?;

    tracing::info!(port = server.port(), "helix-server started");

    tokio::signal::ctrl_c().await?;
    server.shutdown();

    tracing::info!("helix-server shut down cleanly");
    Ok(())
}
