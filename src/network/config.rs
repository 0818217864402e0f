//! Server Configuration
//!
//! Defaults suit local development; every field can be overridden from the
//! environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::network::protocol::DEFAULT_LIMIT;

/// Environment variable for the listen address.
pub const ENV_BIND_ADDR: &str = "LEADERBOARD_BIND_ADDR";
/// Environment variable for the data file path.
pub const ENV_DATA_PATH: &str = "LEADERBOARD_DATA_PATH";
/// Environment variable for the default query limit.
pub const ENV_DEFAULT_LIMIT: &str = "LEADERBOARD_DEFAULT_LIMIT";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// File the leaderboard is persisted to.
    pub data_path: PathBuf,
    /// Result cap when a query has no usable `limit`.
    pub default_limit: usize,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_path: PathBuf::from("data/leaderboard.json"),
            default_limit: DEFAULT_LIMIT,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup, keeping defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = parse_var(&lookup, ENV_BIND_ADDR) {
            config.bind_addr = addr;
        }
        if let Some(path) = lookup(ENV_DATA_PATH).filter(|p| !p.is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(limit) = parse_var::<usize, _>(&lookup, ENV_DEFAULT_LIMIT) {
            if limit > 0 {
                config.default_limit = limit;
            } else {
                warn!("{} must be positive, keeping {}", ENV_DEFAULT_LIMIT, config.default_limit);
            }
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
