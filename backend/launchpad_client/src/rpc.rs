//! Launchpad backend RPC client: pipeline progress, pipeline restart and
//! balance queries over JSON-RPC.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the gateway is unreachable or
//!   rate-limits us, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Soft JSON-RPC errors are retried; attempts are bounded by
//!   `RPC_MAX_ATTEMPTS` so a dead backend surfaces as an error instead of
//!   stalling a poll tick forever.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use launchpad_core::PipelineProgress;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{ClientError, Result};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// Backend seams
// ─────────────────────────────────────────────────────────

/// Remote deployment pipeline operations.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    async fn fetch_progress(&self, deployment_id: &str) -> Result<PipelineProgress>;

    async fn restart_pipeline(&self, deployment_id: &str) -> Result<()>;
}

/// Remote balance lookup: `canister_id → raw balance` for one owner.
///
/// Canisters the backend knows nothing about are simply absent from the map.
#[async_trait]
pub trait BalanceBackend: Send + Sync {
    async fn fetch_balances(
        &self,
        owner: &str,
        canister_ids: &[String],
    ) -> Result<HashMap<String, u128>>;
}

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ProgressResponse {
    pub success: bool,
    pub data: Option<PipelineProgress>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BalancesResponse {
    #[serde(default)]
    pub balances: HashMap<String, Value>,
}

// ─────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    url: String,
    max_attempts: u32,
}

impl RpcClient {
    pub fn new(client: Client, url: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            client,
            url: url.into(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Issue one JSON-RPC call, retrying transient failures.
    async fn call<T: DeserializeOwned + Send>(&self, method: &str, params: Value) -> Result<T> {
        let mut backoff = INITIAL_BACKOFF_SECS;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let last_attempt = attempt >= self.max_attempts;

            let response = self
                .client
                .post(&self.url)
                .json(&json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": method,
                    "params": params,
                }))
                .send()
                .await;

            let resp = match response {
                Err(e) if last_attempt => return Err(ClientError::Http(e)),
                Err(e) => {
                    warn!("{method} request failed (will retry in {backoff}s): {e}");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }
                Ok(resp) => resp,
            };

            if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if last_attempt {
                    return Err(ClientError::Rpc(format!("{method} rate-limited")));
                }
                warn!("{method} rate-limited (will retry in {backoff}s)");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }

            let body: RpcResponse<T> = resp.error_for_status()?.json().await?;

            if let Some(err) = body.error {
                // Code -32600 / -32601 are hard failures; everything else we retry
                if err.code == -32600 || err.code == -32601 || last_attempt {
                    return Err(ClientError::Rpc(format!(
                        "{method} error {}: {}",
                        err.code, err.message
                    )));
                }
                warn!(
                    "{method} soft error (will retry in {backoff}s): {} {}",
                    err.code, err.message
                );
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }

            return body
                .result
                .ok_or_else(|| ClientError::Rpc(format!("Empty result from {method}")));
        }
    }
}

#[async_trait]
impl PipelineBackend for RpcClient {
    async fn fetch_progress(&self, deployment_id: &str) -> Result<PipelineProgress> {
        let response: ProgressResponse = self
            .call("getPipelineProgress", deployment_params(deployment_id))
            .await?;
        progress_from_response(response)
    }

    async fn restart_pipeline(&self, deployment_id: &str) -> Result<()> {
        let response: CommandResponse = self
            .call("adminForceRestartPipeline", deployment_params(deployment_id))
            .await?;
        command_result(response)
    }
}

#[async_trait]
impl BalanceBackend for RpcClient {
    async fn fetch_balances(
        &self,
        owner: &str,
        canister_ids: &[String],
    ) -> Result<HashMap<String, u128>> {
        let response: BalancesResponse = self
            .call("getBalances", balance_params(owner, canister_ids))
            .await?;
        let balances = decode_balances(response);
        debug!(
            "Fetched {} of {} balances for {owner}",
            balances.len(),
            canister_ids.len()
        );
        Ok(balances)
    }
}

fn deployment_params(deployment_id: &str) -> Value {
    json!({ "deploymentId": deployment_id })
}

fn balance_params(owner: &str, canister_ids: &[String]) -> Value {
    json!({
        "owner": owner,
        "canisterIds": canister_ids,
    })
}

// ─────────────────────────────────────────────────────────
// Response decoding
// ─────────────────────────────────────────────────────────

fn progress_from_response(response: ProgressResponse) -> Result<PipelineProgress> {
    match response {
        ProgressResponse {
            success: true,
            data: Some(progress),
            ..
        } => Ok(progress),
        ProgressResponse {
            success: true,
            data: None,
            ..
        } => Err(ClientError::Remote(
            "progress response carried no data".to_string(),
        )),
        ProgressResponse { error, .. } => Err(ClientError::Remote(
            error.unwrap_or_else(|| "failed to load pipeline progress".to_string()),
        )),
    }
}

fn command_result(response: CommandResponse) -> Result<()> {
    if response.success {
        return Ok(());
    }
    Err(ClientError::Remote(
        response
            .error
            .unwrap_or_else(|| "command rejected".to_string()),
    ))
}

/// Keep only entries whose amount parses as an unsigned integer.
fn decode_balances(response: BalancesResponse) -> HashMap<String, u128> {
    response
        .balances
        .into_iter()
        .filter_map(|(canister_id, value)| match parse_raw_amount(&value) {
            Some(amount) => Some((canister_id, amount)),
            None => {
                warn!("Skipping unparsable balance for {canister_id}: {value}");
                None
            }
        })
        .collect()
}

/// Amounts arrive as decimal strings (u128 does not fit a JSON number), but
/// small values are sometimes plain numbers.
fn parse_raw_amount(value: &Value) -> Option<u128> {
    match value {
        Value::String(s) => s.trim().replace('_', "").parse().ok(),
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
