// src/wallets/state.rs

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ethers::types::Address;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    blockchain::{activation::ActivationSnapshot, network::network_name},
    utils::shorten_address,
    wallets::{
        classifier::Prompt,
        types::{ConnectorHandle, ConnectorInfo, WalletConnector, WalletProvider},
    },
};

/// Oldest notifications are dropped past this many.
pub const MAX_NOTIFICATIONS: usize = 16;

/// Connection attempt occupying the pending slot.
#[derive(Clone)]
pub(crate) struct PendingAttempt {
    pub connector: Arc<dyn WalletConnector>,
    pub generation: u64,
}

/// Mutable state owned by the coordinator.
#[derive(Default)]
pub(crate) struct ConnectionState {
    pub initialized: bool,
    pub pending: Option<PendingAttempt>,
    pub active_connector: Option<Arc<dyn WalletConnector>>,
    pub active_handle: Option<Arc<dyn ConnectorHandle>>,
    pub active_provider: Option<Arc<WalletProvider>>,
    pub generation: u64,
    pub selection_visible: bool,
    pub prompts: Prompts,
    pub notifications: VecDeque<Notification>,
}

impl ConnectionState {
    pub fn pending_generation(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.generation)
    }

    pub fn clear_active(&mut self) -> (Option<Arc<dyn WalletConnector>>, Option<Arc<dyn ConnectorHandle>>) {
        self.active_provider = None;
        (self.active_connector.take(), self.active_handle.take())
    }

    pub fn push_notification(&mut self, message: String) -> Uuid {
        let notification = Notification::new(message);
        let id = notification.id;
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        id
    }

    pub fn project(&self, activation: &ActivationSnapshot) -> WalletSnapshot {
        WalletSnapshot {
            initialized: self.initialized,
            connecting: self
                .pending
                .as_ref()
                .map(|p| ConnectorInfo::of(p.connector.as_ref())),
            is_active: activation.active,
            account: activation.account,
            account_label: activation
                .account
                .map(|a| shorten_address(&format!("{:?}", a), 4, 3)),
            network_id: activation.chain_id,
            network_name: activation.chain_id.map(network_name),
            connector: self
                .active_connector
                .as_ref()
                .map(|c| ConnectorInfo::of(c.as_ref())),
            provider: self.active_provider.clone(),
            selection_visible: self.selection_visible,
            prompts: self.prompts,
            notifications: self.notifications.iter().cloned().collect(),
        }
    }
}

/// Flags for the blocking modals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Prompts {
    pub install_provider: bool,
    pub unsupported_network: bool,
}

impl Prompts {
    pub fn set(&mut self, prompt: Prompt, value: bool) {
        match prompt {
            Prompt::InstallProvider => self.install_provider = value,
            Prompt::UnsupportedNetwork => self.unsupported_network = value,
        }
    }
}

/// Transient, dismissible message shown after a connector-specific failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            created_at: Utc::now(),
        }
    }
}

/// Read-only projection published to the presentation bindings.
///
/// Treat it as a snapshot: changing it has no effect on the coordinator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalletSnapshot {
    pub initialized: bool,
    /// Connector of the attempt in flight
    pub connecting: Option<ConnectorInfo>,
    pub is_active: bool,
    pub account: Option<Address>,
    /// Short form of `account` for headers, e.g. `0x1234...678`
    pub account_label: Option<String>,
    pub network_id: Option<u64>,
    pub network_name: Option<String>,
    /// Connector of the committed session
    pub connector: Option<ConnectorInfo>,
    #[serde(skip)]
    pub provider: Option<Arc<WalletProvider>>,
    pub selection_visible: bool,
    pub prompts: Prompts,
    pub notifications: Vec<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_are_bounded() {
        let mut state = ConnectionState::default();
        let first = state.push_notification("first".into());
        for i in 0..MAX_NOTIFICATIONS {
            state.push_notification(format!("n{}", i));
        }

        assert_eq!(state.notifications.len(), MAX_NOTIFICATIONS);
        assert!(state.notifications.iter().all(|n| n.id != first));
    }

    #[test]
    fn test_projection_merges_activation() {
        let state = ConnectionState::default();
        let account: Address = "0x1234567890abcdef1234567890abcdef12345678".parse().unwrap();
        let snapshot = state.project(&ActivationSnapshot {
            active: true,
            account: Some(account),
            chain_id: Some(1),
        });

        assert!(snapshot.is_active);
        assert_eq!(snapshot.account, Some(account));
        assert_eq!(snapshot.account_label.as_deref(), Some("0x1234...678"));
        assert_eq!(snapshot.network_name.as_deref(), Some("Mainnet"));
        assert!(!snapshot.initialized);
        assert!(snapshot.connector.is_none());
    }

    #[test]
    fn test_prompt_flags() {
        let mut prompts = Prompts::default();
        prompts.set(Prompt::UnsupportedNetwork, true);
        assert!(prompts.unsupported_network);
        assert!(!prompts.install_provider);

        prompts.set(Prompt::UnsupportedNetwork, false);
        assert_eq!(prompts, Prompts::default());
    }
}
