// src/blockchain/mod.rs

// Provider activation and the read-only chain queries built on it
pub mod activation;
pub mod balance;
pub mod models;
pub mod network;

pub use activation::{ActivateOptions, ActivationSnapshot, Activator, RpcActivator};
pub use balance::BalanceWatcher;
pub use network::network_name;

// Re-export commonly used types
pub use ethers::types::{Address, U256};
