use super::store::CreditOwner;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// A cached balance and when it was fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub balance: u32,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) >= ttl
    }
}

/// Balance cache with a fixed time-to-live per entry
pub struct CreditCache {
    entries: DashMap<CreditOwner, CacheEntry>,
    ttl: Duration,
}

impl CreditCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn with_ttl_hours(hours: u64) -> Self {
        // capped at ten years
        Self::new(Duration::hours(hours.min(24 * 365 * 10) as i64))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, owner: &CreditOwner) -> Option<u32> {
        self.get_at(owner, Utc::now())
    }

    /// Cached balance if present and fresh at `now`; expired entries are dropped
    pub fn get_at(&self, owner: &CreditOwner, now: DateTime<Utc>) -> Option<u32> {
        let entry = *self.entries.get(owner)?;
        if entry.is_expired(self.ttl, now) {
            self.evict_if_expired(owner, now);
            return None;
        }
        Some(entry.balance)
    }

    /// Remove the entry only if it is still expired; a concurrent `put` survives
    fn evict_if_expired(&self, owner: &CreditOwner, now: DateTime<Utc>) -> bool {
        self.entries
            .remove_if(owner, |_, current| current.is_expired(self.ttl, now))
            .is_some()
    }

    pub fn put(&self, owner: &CreditOwner, balance: u32) {
        self.put_at(owner, balance, Utc::now());
    }

    pub fn put_at(&self, owner: &CreditOwner, balance: u32, fetched_at: DateTime<Utc>) {
        self.entries
            .insert(owner.clone(), CacheEntry { balance, fetched_at });
    }

    pub fn invalidate(&self, owner: &CreditOwner) {
        self.entries.remove(owner);
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(self.ttl, now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
