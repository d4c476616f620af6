// src/wallets/connectors/hardware.rs

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{string_arg, Endpoint, RpcConnectorHandle};
use crate::{
    config::Config,
    wallets::{
        error::ActivationError,
        types::{ConnectArgs, ConnectorHandle, ConnectorMessage, WalletConnector},
    },
};

fn bridge_endpoint(device: &str, configured: &Option<String>, args: Option<&ConnectArgs>) -> Endpoint {
    match string_arg(args, "bridge_url").or_else(|| configured.clone()) {
        Some(url) => Endpoint::Url(url),
        None => Endpoint::Invalid(format!("No {} bridge URL configured", device)),
    }
}

fn device_error(device: &str, error: &ActivationError) -> ConnectorMessage {
    match error {
        ActivationError::Rpc(_) => ConnectorMessage::new(format!(
            "{} device not reachable. Make sure it is connected and unlocked.",
            device
        )),
        other => ConnectorMessage::new(format!("{}: {}", device, other)),
    }
}

#[derive(Debug, Clone)]
pub struct LedgerConnector {
    bridge_url: Option<String>,
    polling_interval: Duration,
}

impl LedgerConnector {
    pub fn new(config: &Config) -> Self {
        Self {
            bridge_url: config.ledger_bridge_url.clone(),
            polling_interval: config.polling_interval,
        }
    }
}

impl WalletConnector for LedgerConnector {
    fn id(&self) -> &'static str {
        "ledger"
    }

    fn name(&self) -> &'static str {
        "Ledger"
    }

    fn factory(&self, network_id: u64, args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
        Arc::new(RpcConnectorHandle::new(
            self.id(),
            network_id,
            bridge_endpoint(self.name(), &self.bridge_url, args),
            self.polling_interval,
        ))
    }

    fn on_connect(&self, handle: &dyn ConnectorHandle, args: Option<&ConnectArgs>) {
        if let Some(path) = string_arg(args, "base_derivation_path") {
            info!(connector = handle.connector_id(), path = %path, "Using custom derivation path");
        }
    }

    fn on_error(&self, error: &ActivationError) -> Option<ConnectorMessage> {
        Some(device_error(self.name(), error))
    }
}

#[derive(Debug, Clone)]
pub struct TrezorConnector {
    bridge_url: Option<String>,
    polling_interval: Duration,
}

impl TrezorConnector {
    pub fn new(config: &Config) -> Self {
        Self {
            bridge_url: config.trezor_bridge_url.clone(),
            polling_interval: config.polling_interval,
        }
    }
}

impl WalletConnector for TrezorConnector {
    fn id(&self) -> &'static str {
        "trezor"
    }

    fn name(&self) -> &'static str {
        "Trezor"
    }

    fn factory(&self, network_id: u64, args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
        Arc::new(RpcConnectorHandle::new(
            self.id(),
            network_id,
            bridge_endpoint(self.name(), &self.bridge_url, args),
            self.polling_interval,
        ))
    }

    fn on_error(&self, error: &ActivationError) -> Option<ConnectorMessage> {
        Some(device_error(self.name(), error))
    }
}
