//! Built-in wallet adapters
//!
//! Every adapter is a thin descriptor whose factory yields an [`RpcConnectorHandle`]: an
//! ethers HTTP provider pointed at the endpoint the wallet exposes. Adapters differ only in
//! where that endpoint comes from and in which hooks they implement.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::{
    config::Config,
    wallets::{
        error::ActivationError,
        registry::WalletRegistry,
        types::{ConnectArgs, ConnectorHandle, WalletConnector, WalletProvider},
    },
};

pub mod hardware;
pub mod injected;
pub mod portis;
pub mod wallet_connect;

pub use hardware::{LedgerConnector, TrezorConnector};
pub use injected::{CoinbaseWalletConnector, MetaMaskConnector};
pub use portis::PortisConnector;
pub use wallet_connect::WalletConnectConnector;

/// Where a handle's provider lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Url(String),
    /// Nothing reachable in this environment
    Missing,
    /// Reachable in principle but misconfigured
    Invalid(String),
}

/// Handle backed by a JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcConnectorHandle {
    connector_id: &'static str,
    network_id: u64,
    endpoint: Endpoint,
    polling_interval: Duration,
}

impl RpcConnectorHandle {
    pub fn new(
        connector_id: &'static str,
        network_id: u64,
        endpoint: Endpoint,
        polling_interval: Duration,
    ) -> Self {
        Self {
            connector_id,
            network_id,
            endpoint,
            polling_interval,
        }
    }
}

#[async_trait]
impl ConnectorHandle for RpcConnectorHandle {
    fn connector_id(&self) -> &str {
        self.connector_id
    }

    async fn get_provider(&self) -> Result<Arc<WalletProvider>, ActivationError> {
        debug!(
            connector = self.connector_id,
            network_id = self.network_id,
            endpoint = ?self.endpoint,
            "Resolving provider"
        );
        match &self.endpoint {
            Endpoint::Missing => Err(ActivationError::NoEthereumProvider),
            Endpoint::Invalid(reason) => Err(ActivationError::Connector(reason.clone())),
            Endpoint::Url(url) => {
                let url = Url::parse(url).map_err(|e| {
                    ActivationError::Connector(format!("Invalid provider URL '{}': {}", url, e))
                })?;
                let provider = WalletProvider::try_from(url.as_str())
                    .map_err(|e| ActivationError::Connector(format!("Failed to create provider: {}", e)))?
                    .interval(self.polling_interval);
                Ok(Arc::new(provider))
            }
        }
    }
}

/// Reads a string argument passed to a factory.
pub(crate) fn string_arg(args: Option<&ConnectArgs>, key: &str) -> Option<String> {
    args.and_then(|a| a.get(key))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// The built-in adapters, in display order.
pub fn default_connectors(config: &Config) -> Vec<Arc<dyn WalletConnector>> {
    vec![
        Arc::new(MetaMaskConnector::new(config)),
        Arc::new(WalletConnectConnector::new(config)),
        Arc::new(LedgerConnector::new(config)),
        Arc::new(TrezorConnector::new(config)),
        Arc::new(CoinbaseWalletConnector::new(config)),
        Arc::new(PortisConnector::new(config)),
    ]
}

pub fn default_registry(config: &Config) -> WalletRegistry {
    WalletRegistry::new(default_connectors(config))
}
