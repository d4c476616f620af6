//! Provider-activation subsystem
//!
//! The activator establishes a session with a connector handle and publishes what the
//! provider reports: whether a session is active, the selected account and the chain id.
//! The coordinator owns the application-level state on top of it.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use ethers_core::types::Address;
use ethers_providers::Middleware;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::wallets::{error::ActivationError, types::ConnectorHandle};

/// Reactive view of the activation subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationSnapshot {
    pub active: bool,
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
}

pub type ErrorCallback = Arc<dyn Fn(&ActivationError) + Send + Sync>;

/// Options for a single activation.
#[derive(Clone, Default)]
pub struct ActivateOptions {
    /// Receives errors the activator swallows instead of returning
    pub on_error: Option<ErrorCallback>,
    /// Return an error for unknown networks instead of silently not activating
    pub throw_on_unsupported_network: bool,
}

impl ActivateOptions {
    /// No automatic error surfacing, unsupported networks reported as errors.
    pub fn strict() -> Self {
        Self {
            on_error: None,
            throw_on_unsupported_network: true,
        }
    }
}

#[async_trait]
pub trait Activator: Send + Sync {
    async fn activate(
        &self,
        handle: Arc<dyn ConnectorHandle>,
        options: ActivateOptions,
    ) -> Result<(), ActivationError>;

    fn deactivate(&self);

    fn snapshot(&self) -> ActivationSnapshot;

    fn subscribe(&self) -> watch::Receiver<ActivationSnapshot>;
}

/// Activator that talks JSON-RPC to the handle's ethers provider.
pub struct RpcActivator {
    supported_chain_ids: BTreeSet<u64>,
    state: watch::Sender<ActivationSnapshot>,
    // Handle of the session currently published as active
    current: Mutex<Option<Arc<dyn ConnectorHandle>>>,
}

impl RpcActivator {
    pub fn new(supported_chain_ids: impl IntoIterator<Item = u64>) -> Self {
        let (state, _) = watch::channel(ActivationSnapshot::default());
        Self {
            supported_chain_ids: supported_chain_ids.into_iter().collect(),
            state,
            current: Mutex::new(None),
        }
    }

    pub fn is_chain_supported(&self, chain_id: u64) -> bool {
        self.supported_chain_ids.contains(&chain_id)
    }
}

#[async_trait]
impl Activator for RpcActivator {
    async fn activate(
        &self,
        handle: Arc<dyn ConnectorHandle>,
        options: ActivateOptions,
    ) -> Result<(), ActivationError> {
        debug!(connector = handle.connector_id(), "Activating connector");

        let provider = handle.get_provider().await?;
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(ActivationError::rpc)?
            .as_u64();

        if !self.is_chain_supported(chain_id) {
            let err = ActivationError::UnsupportedChainId {
                chain_id,
                supported: self.supported_chain_ids.iter().copied().collect(),
            };
            if options.throw_on_unsupported_network {
                return Err(err);
            }
            warn!(chain_id, "Provider is on an unsupported network, not activating");
            if let Some(on_error) = options.on_error.as_ref() {
                on_error(&err);
            }
            return Ok(());
        }

        let accounts = provider
            .get_accounts()
            .await
            .map_err(ActivationError::rpc)?;
        let account = *accounts.first().ok_or(ActivationError::NoAccounts)?;

        *self.current.lock() = Some(handle.clone());
        self.state.send_replace(ActivationSnapshot {
            active: true,
            account: Some(account),
            chain_id: Some(chain_id),
        });

        info!(
            connector = handle.connector_id(),
            chain_id,
            "Activated account {:?}",
            account
        );
        Ok(())
    }

    fn deactivate(&self) {
        if let Some(handle) = self.current.lock().take() {
            debug!(connector = handle.connector_id(), "Deactivating connector");
        }
        self.state.send_replace(ActivationSnapshot::default());
    }

    fn snapshot(&self) -> ActivationSnapshot {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<ActivationSnapshot> {
        self.state.subscribe()
    }
}
