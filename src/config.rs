//! Configuration module
//!
//! Loads the TOML configuration file, applies environment overrides and
//! provides structured configuration types.

use crate::client::{RpcSettings, SUI_COIN_TYPE};
use crate::tx_builder::FeeConfiguration;
use crate::types::ObjectId;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable overriding `network.rpc_url`
pub const ENV_RPC_URL: &str = "JOURNAL_RPC_URL";

/// Environment variable overriding `network.journal_package_id`
pub const ENV_PACKAGE_ID: &str = "JOURNAL_PACKAGE_ID";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Network and full-node configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Fee settings
    #[serde(default)]
    pub gas: GasConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Devnet,
    #[default]
    Testnet,
    Mainnet,
    Localnet,
}

impl Network {
    /// Public full-node URL of the network
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub network: Network,

    /// Full-node URL, defaults to the public node of `network`
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Package that publishes the `journal` module
    #[serde(default)]
    pub journal_package_id: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// How long to wait for a submitted transaction to become final
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Delay between finality polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasConfig {
    /// Fee budget in MIST
    #[serde(default = "default_gas_budget")]
    pub budget: Option<u64>,

    /// Fee price in MIST per computation unit
    #[serde(default = "default_gas_price")]
    pub price: Option<u64>,

    /// Cap on coins merged by one consolidation transaction
    #[serde(default)]
    pub max_fee_object_count: Option<u64>,

    /// Coin type used to pay fees
    #[serde(default = "default_coin_type")]
    pub coin_type: String,
}

// Default value functions
fn default_request_timeout() -> u64 { 30 }
fn default_wait_timeout() -> u64 { 60 }
fn default_poll_interval() -> u64 { 500 }
fn default_gas_budget() -> Option<u64> { Some(100_000_000) }
fn default_gas_price() -> Option<u64> { Some(1000) }
fn default_coin_type() -> String { SUI_COIN_TYPE.to_string() }

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: None,
            journal_package_id: None,
            request_timeout_secs: default_request_timeout(),
            wait_timeout_secs: default_wait_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            budget: default_gas_budget(),
            price: default_gas_price(),
            max_fee_object_count: None,
            coin_type: default_coin_type(),
        }
    }
}

impl NetworkConfig {
    /// Configured URL or the network's public node
    pub fn rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }

    pub fn rpc_settings(&self) -> RpcSettings {
        RpcSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            wait_timeout: Duration::from_secs(self.wait_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// Parsed journal package id
    pub fn package_id(&self) -> anyhow::Result<ObjectId> {
        let raw = self.journal_package_id.as_deref().with_context(|| {
            format!(
                "journal_package_id is not set for {} (config [network] or {})",
                self.network, ENV_PACKAGE_ID
            )
        })?;
        raw.parse()
            .with_context(|| format!("invalid journal_package_id '{}'", raw))
    }
}

impl GasConfig {
    pub fn fee_configuration(&self) -> FeeConfiguration {
        FeeConfiguration {
            budget: self.budget,
            price: self.price,
            max_fee_object_count: self.max_fee_object_count,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `JOURNAL_RPC_URL` / `JOURNAL_PACKAGE_ID` when set
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_RPC_URL).ok(),
            std::env::var(ENV_PACKAGE_ID).ok(),
        );
    }

    fn apply_overrides(&mut self, rpc_url: Option<String>, package_id: Option<String>) {
        if let Some(url) = rpc_url.filter(|v| !v.is_empty()) {
            self.network.rpc_url = Some(url);
        }
        if let Some(id) = package_id.filter(|v| !v.is_empty()) {
            self.network.journal_package_id = Some(id);
        }
    }
}
