//! Balance lookup for the connected account
//!
//! Lookups are de-duplicated: a result is reused for the same account and chain until the
//! polling interval elapses, and concurrent callers share one in-flight fetch.

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use ethers_core::types::{Address, U256};
use ethers_providers::Middleware;
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

use crate::{blockchain::models::BalanceResponse, wallets::state::WalletSnapshot};

#[derive(Debug)]
struct CachedBalance {
    account: Address,
    chain_id: u64,
    fetched_at: Instant,
    balance: BalanceResponse,
}

#[derive(Debug)]
pub struct BalanceWatcher {
    min_interval: Duration,
    // Held across the fetch so concurrent callers wait for one request
    cache: Mutex<Option<CachedBalance>>,
}

impl BalanceWatcher {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            cache: Mutex::new(None),
        }
    }

    /// Balance of the snapshot's account, or `None` while no wallet is connected.
    pub async fn balance(&self, snapshot: &WalletSnapshot) -> Result<Option<BalanceResponse>> {
        let (Some(account), Some(chain_id), Some(provider)) =
            (snapshot.account, snapshot.network_id, snapshot.provider.clone())
        else {
            return Ok(None);
        };
        if !snapshot.is_active {
            return Ok(None);
        }

        self.balance_with(account, chain_id, || async move {
            provider
                .get_balance(account, None)
                .await
                .map_err(|e| anyhow!("Failed to fetch balance for {:?}: {}", account, e))
        })
        .await
        .map(Some)
    }

    pub(crate) async fn balance_with<F, Fut>(
        &self,
        account: Address,
        chain_id: u64,
        fetch: F,
    ) -> Result<BalanceResponse>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<U256>>,
    {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.account == account
                && cached.chain_id == chain_id
                && cached.fetched_at.elapsed() < self.min_interval
            {
                return Ok(cached.balance.clone());
            }
        }

        debug!(chain_id, "Fetching balance for {:?}", account);
        let wei = fetch().await?;
        let balance = BalanceResponse::from_wei(account, chain_id, wei);
        *cache = Some(CachedBalance {
            account,
            chain_id,
            fetched_at: Instant::now(),
            balance: balance.clone(),
        });
        Ok(balance)
    }

    /// Forget the cached value, e.g. after a disconnect.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }
}
