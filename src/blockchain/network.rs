// src/blockchain/network.rs

use ethers::types::Chain;

/// Display name for a chain id, e.g. `Mainnet` or `Sepolia`.
///
/// Unknown ids render as `Chain <id>`.
pub fn network_name(chain_id: u64) -> String {
    match Chain::try_from(chain_id) {
        Ok(chain) => capitalize(&chain.to_string()),
        Err(_) => format!("Chain {}", chain_id),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
