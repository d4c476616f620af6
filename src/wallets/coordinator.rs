//! Connection coordinator
//!
//! Owns the application-level connection state: the attempt in flight, the committed
//! connector and its provider, the modal flags and notifications. It serializes connect
//! attempts, reconciles with the activation subsystem, persists the session record and
//! republishes a [`WalletSnapshot`] after every change.
//!
//! Every failure path lands in a well-defined disconnected state; `connect` never returns an
//! error to its caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    blockchain::activation::{ActivateOptions, Activator},
    wallets::{
        classifier::{classify, Prompt},
        error::ActivationError,
        registry::WalletRegistry,
        session::SessionStore,
        state::{ConnectionState, Notification, PendingAttempt, WalletSnapshot},
        types::{ConnectArgs, ConnectorHandle, WalletConnector},
    },
};

pub struct WalletCoordinator {
    registry: WalletRegistry,
    activator: Arc<dyn Activator>,
    session: Arc<dyn SessionStore>,
    network_id: u64,
    state: Mutex<ConnectionState>,
    published: watch::Sender<WalletSnapshot>,
    reconciled: AtomicBool,
}

impl WalletCoordinator {
    pub fn new(
        registry: WalletRegistry,
        activator: Arc<dyn Activator>,
        session: Arc<dyn SessionStore>,
        network_id: u64,
    ) -> Self {
        let (published, _) = watch::channel(WalletSnapshot::default());
        Self {
            registry,
            activator,
            session,
            network_id,
            state: Mutex::new(ConnectionState::default()),
            published,
            reconciled: AtomicBool::new(false),
        }
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    /// Current projection of the connection state.
    pub fn snapshot(&self) -> WalletSnapshot {
        let activation = self.activator.snapshot();
        self.state.lock().project(&activation)
    }

    /// Receiver that sees every republished snapshot.
    pub fn subscribe(&self) -> watch::Receiver<WalletSnapshot> {
        self.published.subscribe()
    }

    fn publish(&self) {
        self.published.send_replace(self.snapshot());
    }

    /// Connect through `connector`.
    ///
    /// A no-op while another attempt is pending. Always resolves; failures are classified
    /// and turned into prompts or notifications.
    pub async fn connect(&self, connector: Arc<dyn WalletConnector>, args: Option<ConnectArgs>) {
        let generation = {
            let mut state = self.state.lock();
            if let Some(pending) = state.pending.as_ref() {
                debug!(
                    connector = connector.id(),
                    pending = pending.connector.id(),
                    "Connection already pending, ignoring request"
                );
                return;
            }
            state.generation += 1;
            let generation = state.generation;
            state.pending = Some(PendingAttempt {
                connector: connector.clone(),
                generation,
            });
            state.selection_visible = false;
            generation
        };
        self.publish();
        info!(connector = connector.id(), generation, "Connecting wallet");

        let handle = connector.factory(self.network_id, args.as_ref());
        let result = self
            .activator
            .activate(handle.clone(), ActivateOptions::strict())
            .await;

        let result = match result {
            Ok(()) => self.commit(generation, &connector, handle, args.as_ref()).await,
            Err(err) => Err(err),
        };

        if let Err(err) = result {
            if self.is_superseded(generation) {
                debug!(
                    connector = connector.id(),
                    generation,
                    "Superseded attempt failed, discarding: {}",
                    err
                );
            } else {
                self.recover(connector.as_ref(), err);
            }
        }

        {
            let mut state = self.state.lock();
            if state.pending_generation() == Some(generation) {
                state.pending = None;
            }
        }
        self.publish();
    }

    async fn commit(
        &self,
        generation: u64,
        connector: &Arc<dyn WalletConnector>,
        handle: Arc<dyn ConnectorHandle>,
        args: Option<&ConnectArgs>,
    ) -> Result<(), ActivationError> {
        if self.is_superseded(generation) {
            self.abandon(connector.as_ref(), generation);
            return Ok(());
        }

        connector.on_connect(handle.as_ref(), args);
        let provider = handle.get_provider().await?;

        {
            let mut state = self.state.lock();
            if state.pending_generation() != Some(generation) {
                drop(state);
                self.abandon(connector.as_ref(), generation);
                return Ok(());
            }
            state.active_connector = Some(connector.clone());
            state.active_handle = Some(handle);
            state.active_provider = Some(provider);
        }

        if let Err(e) = self.session.write(connector.id()) {
            warn!(connector = connector.id(), "Failed to persist session record: {:#}", e);
        }
        info!(connector = connector.id(), generation, "Wallet connected");
        Ok(())
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.state.lock().pending_generation() != Some(generation)
    }

    fn abandon(&self, connector: &dyn WalletConnector, generation: u64) {
        debug!(connector = connector.id(), generation, "Connection attempt superseded, discarding");

        // The activation finished after a disconnect; nothing may stay active behind our back
        let orphaned = {
            let state = self.state.lock();
            state.pending.is_none() && state.active_connector.is_none()
        };
        if orphaned {
            self.activator.deactivate();
        }
    }

    fn recover(&self, connector: &dyn WalletConnector, err: ActivationError) {
        error!(connector = connector.id(), "Wallet connection failed: {}", err);

        let recovery = classify(&err, connector).recovery();
        {
            let mut state = self.state.lock();
            if let Some(prompt) = recovery.prompt {
                state.prompts.set(prompt, true);
            }
            if let Some(message) = recovery.notification {
                state.push_notification(message);
            }
        }

        if recovery.force_disconnect {
            self.disconnect();
        } else {
            self.revert_active();
        }
    }

    /// Drop the active session without touching the session record.
    fn revert_active(&self) {
        self.activator.deactivate();
        let (connector, handle) = self.state.lock().clear_active();
        if let Some(connector) = connector {
            connector.on_disconnect(handle.as_deref());
        }
    }

    /// Tear the connection down and forget the session record. Idempotent.
    pub fn disconnect(&self) {
        self.activator.deactivate();

        let (connector, handle) = {
            let mut state = self.state.lock();
            state.pending = None;
            state.clear_active()
        };

        if let Some(connector) = connector.as_ref() {
            info!(connector = connector.id(), "Disconnecting wallet");
            connector.on_disconnect(handle.as_deref());
        }

        if let Err(e) = self.session.clear() {
            warn!("Failed to clear session record: {:#}", e);
        }
        self.publish();
    }

    /// Startup reconciliation: reconnect the provider named by the session record, then mark
    /// the coordinator initialized. Runs once; later calls return immediately.
    pub async fn restore_session(&self) {
        if self.reconciled.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.session.read() {
            Ok(Some(id)) => match self.registry.find_by_id(&id) {
                Some(connector) => {
                    info!(connector = %id, "Restoring wallet session");
                    self.connect(connector, None).await;
                }
                None => warn!(connector = %id, "Session record names an unknown connector"),
            },
            Ok(None) => debug!("No session record to restore"),
            Err(e) => warn!("Failed to read session record: {:#}", e),
        }

        self.state.lock().initialized = true;
        self.publish();
    }

    /// Follow the activation subsystem and republish on account or chain changes.
    ///
    /// If the provider drops the session on its own, the committed connector is released;
    /// the session record is kept so the next start retries.
    pub fn watch_activation(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let mut rx = self.activator.subscribe();

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let activation = rx.borrow_and_update().clone();
                let Some(coordinator) = weak.upgrade() else {
                    break;
                };

                if !activation.active {
                    let released = {
                        let mut state = coordinator.state.lock();
                        if state.pending.is_none() && state.active_connector.is_some() {
                            Some(state.clear_active())
                        } else {
                            None
                        }
                    };
                    if let Some((Some(connector), handle)) = released {
                        warn!(connector = connector.id(), "Provider deactivated externally");
                        connector.on_disconnect(handle.as_deref());
                    }
                }
                coordinator.publish();
            }
        })
    }

    pub fn show_selection(&self) {
        self.state.lock().selection_visible = true;
        self.publish();
    }

    pub fn hide_selection(&self) {
        self.state.lock().selection_visible = false;
        self.publish();
    }

    pub fn dismiss_prompt(&self, prompt: Prompt) {
        self.state.lock().prompts.set(prompt, false);
        self.publish();
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().notifications.iter().cloned().collect()
    }

    /// Returns whether a notification with `id` existed.
    pub fn dismiss_notification(&self, id: Uuid) -> bool {
        let removed = {
            let mut state = self.state.lock();
            let before = state.notifications.len();
            state.notifications.retain(|n| n.id != id);
            before != state.notifications.len()
        };
        if removed {
            self.publish();
        }
        removed
    }
}
