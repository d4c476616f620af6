// src/config.rs

use std::collections::HashMap;
use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

/// Default provider polling interval, in milliseconds.
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 12_000;

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Network the connectors are built for (WEB3_CHAIN_ID)
    pub chain_id: u64,
    /// How often providers poll for new blocks; also the balance refresh interval
    pub polling_interval: Duration,
    /// Networks a connected wallet may report. Defaults to the target network only.
    pub supported_chain_ids: Vec<u64>,
    /// JSON-RPC endpoints keyed by chain id, for remote connectors
    pub chain_rpc_urls: HashMap<String, String>,

    // Connector endpoints
    pub injected_provider_url: Option<String>,
    pub ledger_bridge_url: Option<String>,
    pub trezor_bridge_url: Option<String>,
    pub portis_dapp_id: Option<String>,

    // Session settings
    pub session_storage_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            chain_id: 1,
            polling_interval: Duration::from_millis(DEFAULT_POLLING_INTERVAL_MS),
            supported_chain_ids: vec![1],
            chain_rpc_urls: HashMap::new(),
            injected_provider_url: None,
            ledger_bridge_url: None,
            trezor_bridge_url: None,
            portis_dapp_id: None,
            session_storage_path: None,
        }
    }
}

impl Config {
    /// RPC endpoint configured for a chain, if any
    pub fn rpc_url(&self, chain_id: u64) -> Option<&str> {
        self.chain_rpc_urls.get(&chain_id.to_string()).map(String::as_str)
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let chain_id = var("WEB3_CHAIN_ID")
            .unwrap_or_else(|| "1".to_string())
            .trim()
            .parse::<u64>()
            .context("WEB3_CHAIN_ID must be a valid number")?;

        let polling_ms = var("WEB3_POLLING_INTERVAL")
            .unwrap_or_else(|| DEFAULT_POLLING_INTERVAL_MS.to_string())
            .trim()
            .parse::<u64>()
            .context("WEB3_POLLING_INTERVAL must be a number of milliseconds")?;

        let supported_chain_ids = match var("SUPPORTED_CHAIN_IDS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<u64>())
                .collect::<Result<Vec<_>, _>>()
                .context("SUPPORTED_CHAIN_IDS must be a comma separated list of chain ids")?,
            None => vec![chain_id],
        };

        let chain_rpc_urls: HashMap<String, String> = match var("CHAIN_RPC_URLS") {
            Some(json) => serde_json::from_str(&json)
                .context("Invalid CHAIN_RPC_URLS JSON format")?,
            None => HashMap::new(),
        };

        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .trim()
                .parse()
                .context("PORT must be a valid number")?,

            chain_id,
            polling_interval: Duration::from_millis(polling_ms),
            supported_chain_ids,
            chain_rpc_urls,

            injected_provider_url: var("INJECTED_PROVIDER_URL"),
            ledger_bridge_url: var("LEDGER_BRIDGE_URL"),
            trezor_bridge_url: var("TREZOR_BRIDGE_URL"),
            portis_dapp_id: var("PORTIS_DAPP_ID"),

            session_storage_path: var("SESSION_STORAGE_PATH"),
        })
    }
}
