use crate::{
    config::Config,
    credits::{CreditCache, CreditService, CreditStore, InMemoryCreditStore},
    share::ShareStore,
};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Entries removed by one [`AppState::purge_stale`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub cache_entries: usize,
    pub event_ids: usize,
    pub shared_designs: usize,
}

impl PurgeReport {
    pub fn total(&self) -> usize {
        self.cache_entries + self.event_ids + self.shared_designs
    }
}

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<Config>>,
    pub http_client: reqwest::Client,
    pub credits: Arc<CreditService>,
    pub shares: Arc<ShareStore>,
    /// Stripe event ids already applied, with the time they were processed
    pub processed_events: Arc<DashMap<String, DateTime<Utc>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::from_shared(Arc::new(ArcSwap::from_pointee(config)))
    }

    /// Build state around an existing config handle so SIGHUP reloads are visible
    pub fn from_shared(config: Arc<ArcSwap<Config>>) -> Self {
        let store: Arc<dyn CreditStore> = {
            let cfg = config.load();
            Arc::new(InMemoryCreditStore::new(cfg.credits.initial_credits))
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: Arc<ArcSwap<Config>>, store: Arc<dyn CreditStore>) -> Self {
        let (cache_ttl_hours, share) = {
            let cfg = config.load();
            (cfg.credits.cache_ttl_hours, cfg.share.clone())
        };

        Self {
            config,
            http_client: reqwest::Client::new(),
            credits: Arc::new(CreditService::new(
                store,
                CreditCache::with_ttl_hours(cache_ttl_hours),
            )),
            shares: Arc::new(
                ShareStore::new(share.id_length, share.max_attempts)
                    .with_max_designs(share.max_designs),
            ),
            processed_events: Arc::new(DashMap::new()),
        }
    }

    /// Record an event id; returns `false` if it was already processed
    pub fn mark_event_processed(&self, event_id: &str) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.processed_events.entry(event_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                true
            }
        }
    }

    /// Forget an event id so a failed delivery can be retried
    pub fn unmark_event(&self, event_id: &str) {
        self.processed_events.remove(event_id);
    }

    /// Drop expired cache entries, event ids older than `event_retention` and shared
    /// snapshots older than `share_retention`
    pub fn purge_stale(
        &self,
        event_retention: chrono::Duration,
        share_retention: chrono::Duration,
    ) -> PurgeReport {
        let now = Utc::now();
        let cache_entries = self.credits.cache().purge_expired();

        let cutoff = now - event_retention;
        let before = self.processed_events.len();
        self.processed_events.retain(|_, processed_at| *processed_at > cutoff);
        let event_ids = before.saturating_sub(self.processed_events.len());

        let shared_designs = self.shares.purge_created_before(now - share_retention);

        PurgeReport {
            cache_entries,
            event_ids,
            shared_designs,
        }
    }
}
