use super::cache::CreditCache;
use super::store::{CreditOwner, CreditStore};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{debug, info};

/// Cache-through access to credit balances
///
/// Reads are served from the cache while fresh; every write refreshes the cached entry with
/// the balance reported by the store.
pub struct CreditService {
    store: Arc<dyn CreditStore>,
    cache: CreditCache,
}

impl CreditService {
    pub fn new(store: Arc<dyn CreditStore>, cache: CreditCache) -> Self {
        Self { store, cache }
    }

    /// Current balance; `refresh` bypasses the cache and refetches from the store
    pub async fn balance(&self, owner: &CreditOwner, refresh: bool) -> Result<u32, AppError> {
        if refresh {
            self.cache.invalidate(owner);
        } else if let Some(balance) = self.cache.get(owner) {
            debug!(owner = %owner, balance, "Credit balance served from cache");
            return Ok(balance);
        }

        let balance = self.store.get_credits(owner).await?;
        self.cache.put(owner, balance);
        Ok(balance)
    }

    /// Take one credit from the balance, failing with [`AppError::InsufficientCredits`] at zero
    ///
    /// The decrement is a single store operation, so concurrent reservations never overdraw.
    pub async fn reserve(&self, owner: &CreditOwner) -> Result<u32, AppError> {
        match self.store.use_credit(owner).await {
            Ok(remaining) => {
                self.cache.put(owner, remaining);
                debug!(owner = %owner, remaining, "Credit reserved");
                Ok(remaining)
            }
            Err(AppError::InsufficientCredits) => {
                self.cache.put(owner, 0);
                Err(AppError::InsufficientCredits)
            }
            Err(e) => {
                self.cache.invalidate(owner);
                Err(e)
            }
        }
    }

    /// Return a reserved credit after the work it paid for failed
    pub async fn refund(&self, owner: &CreditOwner) -> Result<u32, AppError> {
        match self.store.add_credits(owner, 1).await {
            Ok(balance) => {
                self.cache.put(owner, balance);
                info!(owner = %owner, balance, "Reserved credit refunded");
                Ok(balance)
            }
            Err(e) => {
                self.cache.invalidate(owner);
                Err(e)
            }
        }
    }

    /// Consume one credit
    pub async fn consume(&self, owner: &CreditOwner) -> Result<u32, AppError> {
        let remaining = self.reserve(owner).await?;
        crate::metrics::record_credit_consumed(owner.kind());
        info!(owner = %owner, remaining, "Credit consumed");
        Ok(remaining)
    }

    /// Credit a completed purchase
    pub async fn add(&self, owner: &CreditOwner, amount: u32) -> Result<u32, AppError> {
        match self.store.add_credits(owner, amount).await {
            Ok(balance) => {
                self.cache.put(owner, balance);
                crate::metrics::record_credits_purchased(amount);
                info!(owner = %owner, amount, balance, "Credits added");
                Ok(balance)
            }
            Err(e) => {
                self.cache.invalidate(owner);
                Err(e)
            }
        }
    }

    pub fn cache(&self) -> &CreditCache {
        &self.cache
    }
}
