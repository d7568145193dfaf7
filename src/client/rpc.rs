//! JSON-RPC 2.0 client for a full node
//!
//! Only the read side lives here: coin queries and finality polling.

use super::{ChainClient, CoinRecord, ExecutionEffects, ProviderError};
use crate::types::SuiAddress;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Largest page the full node hands out for coin queries
const COIN_PAGE_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct RpcSettings {
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Total time to wait for a digest to become visible
    pub wait_timeout: Duration,
    /// Delay between finality polls
    pub poll_interval: Duration,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            wait_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

pub struct RpcClient {
    http: reqwest::Client,
    endpoint: String,
    settings: RpcSettings,
    next_id: AtomicU64,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinPage {
    data: Vec<CoinRecord>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Deserialize)]
struct TransactionBlock {
    digest: String,
    #[serde(default)]
    effects: Option<ExecutionEffects>,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>, settings: RpcSettings) -> Result<Self, ProviderError> {
        let endpoint = endpoint.into();
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ProviderError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint,
            settings,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(method, id, endpoint = %self.endpoint, "JSON-RPC request");

        let timeout_ms = self.settings.request_timeout.as_millis() as u64;
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, &self.endpoint, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::RpcResponse {
                endpoint: self.endpoint.clone(),
                message: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
                code: Some(status.as_u16() as i64),
            });
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, &self.endpoint, timeout_ms))?;

        if let Some(err) = envelope.error {
            return Err(ProviderError::RpcResponse {
                endpoint: self.endpoint.clone(),
                message: err.message,
                code: Some(err.code),
            });
        }

        let result = envelope.result.ok_or_else(|| ProviderError::Decode {
            endpoint: self.endpoint.clone(),
            message: format!("{} response has neither result nor error", method),
        })?;

        serde_json::from_value(result).map_err(|e| ProviderError::Decode {
            endpoint: self.endpoint.clone(),
            message: format!("{}: {}", method, e),
        })
    }
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn get_coins(
        &self,
        owner: &SuiAddress,
        coin_type: &str,
    ) -> Result<Vec<CoinRecord>, ProviderError> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page: CoinPage = self
                .call(
                    "suix_getCoins",
                    json!([owner.to_string(), coin_type, cursor, COIN_PAGE_LIMIT]),
                )
                .await?;
            coins.extend(page.data);

            match (page.has_next_page, page.next_cursor) {
                (true, Some(next)) if cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next)
                }
                (true, Some(next)) => {
                    warn!(owner = %owner, cursor = %next, "Coin cursor did not advance, stopping");
                    break;
                }
                _ => break,
            }
        }

        debug!(owner = %owner, coin_type, coin_count = coins.len(), "Fetched coins");
        Ok(coins)
    }

    async fn wait_for_transaction(&self, digest: &str) -> Result<ExecutionEffects, ProviderError> {
        let deadline = Instant::now() + self.settings.wait_timeout;

        loop {
            let result: Result<TransactionBlock, ProviderError> = self
                .call(
                    "sui_getTransactionBlock",
                    json!([digest, { "showEffects": true }]),
                )
                .await;

            match result {
                Ok(block) => {
                    return block.effects.ok_or_else(|| ProviderError::Decode {
                        endpoint: self.endpoint.clone(),
                        message: format!("transaction {} returned without effects", block.digest),
                    });
                }
                Err(e) if e.is_transaction_not_found() => {
                    if Instant::now() >= deadline {
                        return Err(ProviderError::Timeout {
                            endpoint: self.endpoint.clone(),
                            timeout_ms: self.settings.wait_timeout.as_millis() as u64,
                        });
                    }
                    trace!(digest, "Transaction not yet visible, polling again");
                    tokio::time::sleep(self.settings.poll_interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
