// src/lib.rs

use std::sync::Arc;

// Re-export commonly used types
pub use ethers::types::{Address, U256};

// Re-export modules
pub mod api;
pub mod blockchain;
pub mod config;
pub mod rpc;
pub mod utils;
pub mod wallets;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Owns the wallet connection lifecycle
    pub coordinator: Arc<wallets::WalletCoordinator>,
    /// Rate-limited balance lookups for the connected account
    pub balances: Arc<blockchain::BalanceWatcher>,
}

impl AppState {
    pub fn new(config: config::Config, coordinator: Arc<wallets::WalletCoordinator>) -> Self {
        let balances = Arc::new(blockchain::BalanceWatcher::new(config.polling_interval));
        Self {
            config,
            coordinator,
            balances,
        }
    }
}
