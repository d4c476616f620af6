//! Descriptor and handle abstractions shared by every wallet adapter.
//!
//! A [`WalletConnector`] is the static description of one wallet integration. Calling its
//! factory yields a [`ConnectorHandle`], the live connector for a single connection attempt.
//! The coordinator never looks past these two traits at the concrete adapter.

use std::sync::Arc;

use async_trait::async_trait;
use ethers_providers::{Http, Provider};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::wallets::error::ActivationError;

/// Free-form arguments forwarded to a connector factory for one attempt.
pub type ConnectArgs = Map<String, Value>;

/// The provider object resolved from an activated handle.
pub type WalletProvider = Provider<Http>;

/// User-facing message produced by a connector's error hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorMessage {
    pub message: String,
}

impl ConnectorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Live connector produced by a descriptor's factory.
#[async_trait]
pub trait ConnectorHandle: Send + Sync {
    /// Id of the descriptor that built this handle
    fn connector_id(&self) -> &str;

    /// Resolve the provider backing this handle.
    async fn get_provider(&self) -> Result<Arc<WalletProvider>, ActivationError>;
}

/// Static description of a wallet integration.
///
/// Hooks are optional: adapters override only the ones they need.
pub trait WalletConnector: Send + Sync {
    /// Stable id, unique across the registry
    fn id(&self) -> &'static str;

    /// Human readable name
    fn name(&self) -> &'static str;

    /// Build a handle targeting `network_id`.
    fn factory(&self, network_id: u64, args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle>;

    fn on_connect(&self, _handle: &dyn ConnectorHandle, _args: Option<&ConnectArgs>) {}

    fn on_disconnect(&self, _handle: Option<&dyn ConnectorHandle>) {}

    /// Translate an activation failure into a message, or `None` to suppress it.
    fn on_error(&self, _error: &ActivationError) -> Option<ConnectorMessage> {
        None
    }
}

/// Serializable summary of a descriptor, used in published state and listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorInfo {
    pub id: String,
    pub name: String,
}

impl ConnectorInfo {
    pub fn of(connector: &dyn WalletConnector) -> Self {
        Self {
            id: connector.id().to_string(),
            name: connector.name().to_string(),
        }
    }
}
