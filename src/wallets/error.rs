// src/wallets/error.rs

use thiserror::Error;

/// Failures reported by the provider-activation subsystem or a connector handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// No wallet extension or provider endpoint is reachable at all.
    #[error("no Ethereum provider was found in this environment")]
    NoEthereumProvider,
    #[error("unsupported chain id {chain_id}, supported: {supported:?}")]
    UnsupportedChainId { chain_id: u64, supported: Vec<u64> },
    #[error("the user rejected the connection request")]
    UserRejected,
    #[error("the provider did not expose any accounts")]
    NoAccounts,
    #[error("provider request failed: {0}")]
    Rpc(String),
    #[error("{0}")]
    Connector(String),
}

impl ActivationError {
    /// Wraps a JSON-RPC failure from an ethers provider.
    pub fn rpc(err: impl std::fmt::Display) -> Self {
        ActivationError::Rpc(err.to_string())
    }
}
