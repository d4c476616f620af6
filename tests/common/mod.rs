//! Scripted activation subsystem and connectors shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::types::Address;
use parking_lot::Mutex;
use tokio::sync::{watch, Notify};

use evm_wallet_connect::{
    blockchain::{ActivateOptions, ActivationSnapshot, Activator},
    wallets::{
        ActivationError, ConnectArgs, ConnectorHandle, ConnectorMessage, MemorySessionStore,
        WalletConnector, WalletCoordinator, WalletProvider, WalletRegistry, WalletSnapshot,
    },
};

pub const NETWORK_ID: u64 = 1;

pub fn account(byte: u8) -> Address {
    Address::from([byte; 20])
}

/// What the fake activator does for a given connector id.
#[derive(Clone, Debug)]
pub enum Script {
    Activate { account: Address, chain_id: u64 },
    Fail(ActivationError),
}

pub struct FakeActivator {
    scripts: Mutex<HashMap<String, Script>>,
    supported: HashSet<u64>,
    gate: Mutex<Option<Arc<Notify>>>,
    connector_gates: Mutex<HashMap<String, Arc<Notify>>>,
    activations: AtomicUsize,
    deactivations: AtomicUsize,
    state: watch::Sender<ActivationSnapshot>,
}

impl FakeActivator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ActivationSnapshot::default());
        Self {
            scripts: Mutex::new(HashMap::new()),
            supported: [NETWORK_ID].into_iter().collect(),
            gate: Mutex::new(None),
            connector_gates: Mutex::new(HashMap::new()),
            activations: AtomicUsize::new(0),
            deactivations: AtomicUsize::new(0),
            state,
        }
    }

    pub fn script(&self, connector_id: &str, script: Script) {
        self.scripts.lock().insert(connector_id.to_string(), script);
    }

    /// Hold every activation until the returned gate is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    /// Hold activations of one connector until the returned gate is notified.
    pub fn hold_connector(&self, connector_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.connector_gates
            .lock()
            .insert(connector_id.to_string(), gate.clone());
        gate
    }

    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }

    pub fn deactivations(&self) -> usize {
        self.deactivations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Activator for FakeActivator {
    async fn activate(
        &self,
        handle: Arc<dyn ConnectorHandle>,
        options: ActivateOptions,
    ) -> Result<(), ActivationError> {
        self.activations.fetch_add(1, Ordering::SeqCst);

        let gate = self
            .connector_gates
            .lock()
            .get(handle.connector_id())
            .cloned()
            .or_else(|| self.gate.lock().clone());
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let script = self
            .scripts
            .lock()
            .get(handle.connector_id())
            .cloned()
            .unwrap_or(Script::Activate {
                account: account(0xaa),
                chain_id: NETWORK_ID,
            });

        match script {
            Script::Fail(err) => Err(err),
            Script::Activate { account, chain_id } => {
                if !self.supported.contains(&chain_id) {
                    let err = ActivationError::UnsupportedChainId {
                        chain_id,
                        supported: self.supported.iter().copied().collect(),
                    };
                    if options.throw_on_unsupported_network {
                        return Err(err);
                    }
                    return Ok(());
                }
                self.state.send_replace(ActivationSnapshot {
                    active: true,
                    account: Some(account),
                    chain_id: Some(chain_id),
                });
                Ok(())
            }
        }
    }

    fn deactivate(&self) {
        self.deactivations.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(ActivationSnapshot::default());
    }

    fn snapshot(&self) -> ActivationSnapshot {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<ActivationSnapshot> {
        self.state.subscribe()
    }
}

pub struct FakeHandle {
    id: &'static str,
    provider_error: Option<ActivationError>,
}

#[async_trait]
impl ConnectorHandle for FakeHandle {
    fn connector_id(&self) -> &str {
        self.id
    }

    async fn get_provider(&self) -> Result<Arc<WalletProvider>, ActivationError> {
        if let Some(err) = self.provider_error.clone() {
            return Err(err);
        }
        let provider = WalletProvider::try_from("http://127.0.0.1:8545")
            .map_err(|e| ActivationError::Connector(e.to_string()))?;
        Ok(Arc::new(provider))
    }
}

/// Connector that counts hook invocations.
pub struct FakeConnector {
    id: &'static str,
    error_message: Option<&'static str>,
    provider_error: Option<ActivationError>,
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub factory_calls: AtomicUsize,
}

impl FakeConnector {
    pub fn new(id: &'static str) -> Arc<Self> {
        Arc::new(Self::build(id, None, None))
    }

    pub fn with_error_message(id: &'static str, message: &'static str) -> Arc<Self> {
        Arc::new(Self::build(id, Some(message), None))
    }

    pub fn with_provider_error(id: &'static str, err: ActivationError) -> Arc<Self> {
        Arc::new(Self::build(id, Some("provider unavailable"), Some(err)))
    }

    fn build(
        id: &'static str,
        error_message: Option<&'static str>,
        provider_error: Option<ActivationError>,
    ) -> Self {
        Self {
            id,
            error_message,
            provider_error,
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            factory_calls: AtomicUsize::new(0),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn factory_calls(&self) -> usize {
        self.factory_calls.load(Ordering::SeqCst)
    }
}

impl WalletConnector for FakeConnector {
    fn id(&self) -> &'static str {
        self.id
    }

    fn name(&self) -> &'static str {
        self.id
    }

    fn factory(&self, network_id: u64, _args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
        assert_eq!(network_id, NETWORK_ID);
        self.factory_calls.fetch_add(1, Ordering::SeqCst);
        Arc::new(FakeHandle {
            id: self.id,
            provider_error: self.provider_error.clone(),
        })
    }

    fn on_connect(&self, _handle: &dyn ConnectorHandle, _args: Option<&ConnectArgs>) {
        self.connects.fetch_add(1, Ordering::SeqCst);
    }

    fn on_disconnect(&self, _handle: Option<&dyn ConnectorHandle>) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, _error: &ActivationError) -> Option<ConnectorMessage> {
        self.error_message.map(ConnectorMessage::new)
    }
}

pub struct Harness {
    pub coordinator: Arc<WalletCoordinator>,
    pub activator: Arc<FakeActivator>,
    pub session: Arc<MemorySessionStore>,
}

pub fn harness(connectors: Vec<Arc<FakeConnector>>, session: MemorySessionStore) -> Harness {
    let activator = Arc::new(FakeActivator::new());
    let session = Arc::new(session);
    let registry = WalletRegistry::new(
        connectors
            .into_iter()
            .map(|c| c as Arc<dyn WalletConnector>)
            .collect(),
    );
    let coordinator = Arc::new(WalletCoordinator::new(
        registry,
        activator.clone(),
        session.clone(),
        NETWORK_ID,
    ));
    Harness {
        coordinator,
        activator,
        session,
    }
}

/// Wait until a published snapshot satisfies `predicate`.
pub async fn wait_for_snapshot<F>(rx: &mut watch::Receiver<WalletSnapshot>, predicate: F)
where
    F: FnMut(&WalletSnapshot) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for wallet snapshot")
        .expect("coordinator dropped");
}
