// src/wallets/connectors/wallet_connect.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{string_arg, Endpoint, RpcConnectorHandle};
use crate::{
    config::Config,
    wallets::{
        error::ActivationError,
        types::{ConnectArgs, ConnectorHandle, ConnectorMessage, WalletConnector},
    },
};

/// WalletConnect session relayed through a JSON-RPC endpoint for the target network.
#[derive(Debug, Clone)]
pub struct WalletConnectConnector {
    rpc_urls: HashMap<String, String>,
    polling_interval: Duration,
}

impl WalletConnectConnector {
    pub fn new(config: &Config) -> Self {
        Self {
            rpc_urls: config.chain_rpc_urls.clone(),
            polling_interval: config.polling_interval,
        }
    }
}

impl WalletConnector for WalletConnectConnector {
    fn id(&self) -> &'static str {
        "walletconnect"
    }

    fn name(&self) -> &'static str {
        "WalletConnect"
    }

    fn factory(&self, network_id: u64, args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
        let endpoint = match string_arg(args, "rpc_url")
            .or_else(|| self.rpc_urls.get(&network_id.to_string()).cloned())
        {
            Some(url) => Endpoint::Url(url),
            None => Endpoint::Invalid(format!(
                "No WalletConnect RPC URL configured for chain {}",
                network_id
            )),
        };
        Arc::new(RpcConnectorHandle::new(
            self.id(),
            network_id,
            endpoint,
            self.polling_interval,
        ))
    }

    fn on_error(&self, error: &ActivationError) -> Option<ConnectorMessage> {
        match error {
            // Closing the pairing modal is not worth a notification
            ActivationError::UserRejected => None,
            other => Some(ConnectorMessage::new(other.to_string())),
        }
    }
}
