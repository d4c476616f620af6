// src/blockchain/models.rs
use chrono::{DateTime, Utc};
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

// --- Balance Models ---

/// Native balance of the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account: Address,
    pub chain_id: u64,
    /// Raw balance in wei, as a decimal string
    pub amount: String,
    /// Balance in ether rounded to 4 decimals
    pub formatted: String,
    pub denom: String,
    pub fetched_at: DateTime<Utc>,
}

impl BalanceResponse {
    pub fn from_wei(account: Address, chain_id: u64, wei: U256) -> Self {
        Self {
            account,
            chain_id,
            amount: wei.to_string(),
            formatted: format_ether(wei),
            denom: "ETH".to_string(),
            fetched_at: Utc::now(),
        }
    }
}

/// Formats a wei amount as ether with 4 decimals, truncating the rest.
pub fn format_ether(wei: U256) -> String {
    let ether = ethers_core::utils::format_ether(wei);
    match ether.split_once('.') {
        Some((whole, fraction)) => format!("{}.{:0<4.4}", whole, fraction),
        None => format!("{}.0000", ether),
    }
}
