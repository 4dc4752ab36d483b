//! HTTP server settings read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_MAX_BODY: usize = 1024 * 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub max_body_size: usize,
    pub request_timeout: Duration,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 5001)),
            max_body_size: DEFAULT_MAX_BODY,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment. Unparseable values fall
    /// back to the defaults.
    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let address = get("ADDRESS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.address);
        let max_body_size = get("MAX_HTTP_BODY_SIZE")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(defaults.max_body_size);
        let request_timeout = get("REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let log_filter = get("MINDAIGLE_LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or(defaults.log_filter);

        Self {
            address,
            max_body_size,
            request_timeout,
            log_filter,
        }
    }
}
