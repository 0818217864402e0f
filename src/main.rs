//! Leaderboard Server
//!
//! Loads the persisted leaderboard, then serves it over HTTP until Ctrl+C.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use leaderboard::store::quarantine;
use leaderboard::{LeaderboardServer, RankedStore, ServerConfig, StoreError, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();

    info!("Leaderboard Server v{}", VERSION);
    info!("Data file: {}", config.data_path.display());
    info!("Default limit: {}", config.default_limit);

    let store = Arc::new(RankedStore::new());
    match store.load_from_file(&config.data_path).await {
        Ok(count) => info!("Restored {} entries", count),
        Err(StoreError::NotFound { .. }) => info!("No saved leaderboard, starting empty"),
        Err(e @ StoreError::Decode(_)) => {
            error!("Saved leaderboard is corrupt, starting empty: {}", e);
            match quarantine(&config.data_path).await {
                Ok(moved) => warn!("Moved corrupt leaderboard to {}", moved.display()),
                Err(e) => error!("Could not move corrupt leaderboard aside: {}", e),
            }
        }
        Err(e) => warn!("Could not read saved leaderboard, starting empty: {}", e),
    }

    let server = LeaderboardServer::new(store, config);
    server.run().await?;

    info!("Server stopped");
    Ok(())
}
