//! Application configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use crate::errors::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC gateway of the launchpad backend
    pub backend_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Deployment whose pipeline should be watched, if any
    pub deployment_id: Option<String>,
    /// How often (in milliseconds) to poll pipeline progress
    pub poll_interval_ms: u64,
    /// Number of tokens per balance query
    pub balance_batch_size: usize,
    /// Pause (in milliseconds) between consecutive balance batches
    pub balance_batch_delay_ms: u64,
    /// Per-request HTTP timeout
    pub rpc_timeout_secs: u64,
    /// Attempts per RPC call before giving up on transient failures
    pub rpc_max_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            backend_url: env_var("BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:4943/rpc".to_string()),
            api_port: parse_env("API_PORT", 3002)?,
            deployment_id: env_var("DEPLOYMENT_ID").ok().filter(|id| !id.trim().is_empty()),
            poll_interval_ms: parse_env("PIPELINE_POLL_INTERVAL_MS", 3_000)?,
            balance_batch_size: parse_env("BALANCE_BATCH_SIZE", 40)?,
            balance_batch_delay_ms: parse_env("BALANCE_BATCH_DELAY_MS", 100)?,
            rpc_timeout_secs: parse_env("RPC_TIMEOUT_SECS", 30)?,
            rpc_max_attempts: parse_env("RPC_MAX_ATTEMPTS", 3)?,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn balance_batch_delay(&self) -> Duration {
        Duration::from_millis(self.balance_batch_delay_ms)
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ClientError::Config(format!("Missing env var: {key}")))
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env_var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ClientError::Config(format!("Invalid {key}"))),
        Err(_) => Ok(default),
    }
}
