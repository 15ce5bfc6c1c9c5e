//! Configuration Module
//!
//! Handles loading server and remote-client settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Reaper sweep interval in milliseconds
    pub cleanup_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CLEANUP_INTERVAL_MS` - Reaper sweep interval (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cleanup_interval_ms: env_or("CLEANUP_INTERVAL_MS", defaults.cleanup_interval_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Reaper sweep interval as a Duration.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cleanup_interval_ms: 1000,
            server_port: 3000,
        }
    }
}

/// Settings for [`RemoteStore`](crate::storage::RemoteStore).
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of a `mini_store` server, e.g. `http://127.0.0.1:3000`
    pub base_url: String,
    /// Deadline applied to every remote call
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Creates a new RemoteConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_URL` - Server base URL (default: `http://127.0.0.1:3000`)
    /// - `REQUEST_TIMEOUT_MS` - Per-call timeout (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("STORE_URL").unwrap_or(defaults.base_url),
            timeout: Duration::from_millis(env_or(
                "REQUEST_TIMEOUT_MS",
                defaults.timeout.as_millis() as u64,
            )),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timeout: Duration::from_secs(1),
        }
    }
}

/// Parses an environment variable, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
