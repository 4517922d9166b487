//! Client configuration.
//!
//! Built either explicitly (mobile shell passes values through) or from
//! `PROPSYNC_*` environment variables for the development CLI and tests.

use propsync_core::DEFAULT_CAPACITY;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// How often the engine syncs while a session is active.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PROPSYNC_SERVER_URL is not set")]
    MissingServerUrl,

    #[error("invalid sync interval: {0}")]
    InvalidInterval(String),

    #[error("invalid cache capacity: {0}")]
    InvalidCapacity(String),
}

/// Settings for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the backend
    pub server_url: String,
    /// Fixed interval between background sync cycles
    pub sync_interval: Duration,
    /// Maximum number of properties kept locally
    pub cache_capacity: usize,
    /// Where to persist the store snapshot, if anywhere
    pub snapshot_path: Option<PathBuf>,
    /// Device identifier forwarded to the backend
    pub device_id: Option<String>,
}

impl SyncConfig {
    /// Defaults for the given server.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            sync_interval: DEFAULT_SYNC_INTERVAL,
            cache_capacity: DEFAULT_CAPACITY,
            snapshot_path: None,
            device_id: None,
        }
    }

    /// Override the sync interval.
    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Override the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Persist snapshots to `path` after each cycle.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Tag requests with a device id.
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Load configuration from `PROPSYNC_*` environment variables.
    ///
    /// `PROPSYNC_SERVER_URL` is required; `PROPSYNC_SYNC_INTERVAL_SECS`,
    /// `PROPSYNC_CACHE_CAPACITY` and `PROPSYNC_SNAPSHOT_PATH` fall back to
    /// defaults when absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url =
            std::env::var("PROPSYNC_SERVER_URL").map_err(|_| ConfigError::MissingServerUrl)?;
        let mut config = Self::new(server_url);

        if let Ok(raw) = std::env::var("PROPSYNC_SYNC_INTERVAL_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ConfigError::InvalidInterval(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidInterval(raw));
            }
            config.sync_interval = Duration::from_secs(secs);
        }

        if let Ok(raw) = std::env::var("PROPSYNC_CACHE_CAPACITY") {
            let capacity: usize = raw
                .parse()
                .map_err(|_| ConfigError::InvalidCapacity(raw.clone()))?;
            if capacity == 0 {
                return Err(ConfigError::InvalidCapacity(raw));
            }
            config.cache_capacity = capacity;
        }

        if let Ok(path) = std::env::var("PROPSYNC_SNAPSHOT_PATH") {
            config.snapshot_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}
