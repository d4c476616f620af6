// src/wallets/connectors/injected.rs

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{Endpoint, RpcConnectorHandle};
use crate::{
    config::Config,
    wallets::{
        error::ActivationError,
        types::{ConnectArgs, ConnectorHandle, ConnectorMessage, WalletConnector},
    },
};

/// Endpoint of the injected provider; missing when no extension is exposed.
fn injected_endpoint(url: &Option<String>) -> Endpoint {
    match url {
        Some(url) => Endpoint::Url(url.clone()),
        None => Endpoint::Missing,
    }
}

/// Browser-extension wallet exposed as an injected JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct MetaMaskConnector {
    provider_url: Option<String>,
    polling_interval: Duration,
}

impl MetaMaskConnector {
    pub fn new(config: &Config) -> Self {
        Self {
            provider_url: config.injected_provider_url.clone(),
            polling_interval: config.polling_interval,
        }
    }
}

impl WalletConnector for MetaMaskConnector {
    fn id(&self) -> &'static str {
        "metamask"
    }

    fn name(&self) -> &'static str {
        "MetaMask"
    }

    fn factory(&self, network_id: u64, _args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
        Arc::new(RpcConnectorHandle::new(
            self.id(),
            network_id,
            injected_endpoint(&self.provider_url),
            self.polling_interval,
        ))
    }

    fn on_error(&self, error: &ActivationError) -> Option<ConnectorMessage> {
        Some(ConnectorMessage::new(error.to_string()))
    }
}

/// Coinbase Wallet through its injected provider.
#[derive(Debug, Clone)]
pub struct CoinbaseWalletConnector {
    provider_url: Option<String>,
    polling_interval: Duration,
}

impl CoinbaseWalletConnector {
    pub fn new(config: &Config) -> Self {
        Self {
            provider_url: config.injected_provider_url.clone(),
            polling_interval: config.polling_interval,
        }
    }
}

impl WalletConnector for CoinbaseWalletConnector {
    fn id(&self) -> &'static str {
        "coinbase"
    }

    fn name(&self) -> &'static str {
        "Coinbase Wallet"
    }

    fn factory(&self, network_id: u64, _args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
        Arc::new(RpcConnectorHandle::new(
            self.id(),
            network_id,
            injected_endpoint(&self.provider_url),
            self.polling_interval,
        ))
    }

    fn on_disconnect(&self, handle: Option<&dyn ConnectorHandle>) {
        if let Some(handle) = handle {
            info!(connector = handle.connector_id(), "Closing Coinbase Wallet session");
        }
    }

    fn on_error(&self, error: &ActivationError) -> Option<ConnectorMessage> {
        Some(ConnectorMessage::new(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_injected_provider() {
        let connector = MetaMaskConnector::new(&Config::default());
        let handle = connector.factory(1, None);
        assert_eq!(handle.connector_id(), "metamask");
        assert_eq!(
            handle.get_provider().await.err(),
            Some(ActivationError::NoEthereumProvider)
        );
    }

    #[tokio::test]
    async fn test_injected_provider_configured() {
        let config = Config {
            injected_provider_url: Some("http://127.0.0.1:8545".into()),
            ..Config::default()
        };
        let handle = CoinbaseWalletConnector::new(&config).factory(1, None);
        assert!(handle.get_provider().await.is_ok());
    }

    #[test]
    fn test_errors_are_surfaced() {
        let connector = MetaMaskConnector::new(&Config::default());
        let message = connector.on_error(&ActivationError::UserRejected).unwrap();
        assert_eq!(message.message, "the user rejected the connection request");
    }
}
