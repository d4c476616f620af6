// src/wallets/connectors/portis.rs

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

/// Hosted Portis wallet; needs a registered dapp id.
#[derive(Debug, Clone)]
pub struct PortisConnector {
    dapp_id: Option<String>,
    rpc_urls: HashMap<String, String>,
    polling_interval: Duration,
}

impl PortisConnector {
    pub fn new(config: &Config) -> Self {
        Self {
            dapp_id: config.portis_dapp_id.clone(),
            rpc_urls: config.chain_rpc_urls.clone(),
            polling_interval: config.polling_interval,
        }
    }
}

impl WalletConnector for PortisConnector {
    fn id(&self) -> &'static str {
        "portis"
    }

    fn name(&self) -> &'static str {
        "Portis"
    }

    fn factory(&self, network_id: u64, args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
        let url = string_arg(args, "rpc_url")
            .or_else(|| self.rpc_urls.get(&network_id.to_string()).cloned());
        let endpoint = match (&self.dapp_id, url) {
            (None, _) => Endpoint::Invalid("PORTIS_DAPP_ID is not configured".to_string()),
            (Some(_), Some(url)) => Endpoint::Url(url),
            (Some(_), None) => Endpoint::Invalid(format!(
                "No Portis RPC URL configured for chain {}",
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
        Some(ConnectorMessage::new(error.to_string()))
    }
}
