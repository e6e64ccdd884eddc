//! Shareable design snapshots
//!
//! A snapshot is stored under a short random alphanumeric id that clients turn into a link.

use crate::design::DesignSelections;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedDesign {
    pub id: String,
    pub selections: DesignSelections,
    pub created_at: DateTime<Utc>,
}

type IdGenerator = Box<dyn Fn(usize) -> String + Send + Sync>;

pub struct ShareStore {
    designs: DashMap<String, SharedDesign>,
    id_length: usize,
    max_attempts: u32,
    max_designs: usize,
    generate_id: IdGenerator,
}

/// Random alphanumeric id of `len` characters
pub fn random_share_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

impl ShareStore {
    pub fn new(id_length: usize, max_attempts: u32) -> Self {
        Self::with_id_generator(id_length, max_attempts, Box::new(random_share_id))
    }

    pub fn with_id_generator(id_length: usize, max_attempts: u32, generate_id: IdGenerator) -> Self {
        Self {
            designs: DashMap::new(),
            id_length,
            max_attempts,
            max_designs: usize::MAX,
            generate_id,
        }
    }

    /// Refuse new snapshots once `max_designs` are stored
    pub fn with_max_designs(mut self, max_designs: usize) -> Self {
        self.max_designs = max_designs;
        self
    }

    /// Store a snapshot under a fresh id
    ///
    /// A colliding id is regenerated, up to `max_attempts` tries in total.
    pub fn create(&self, selections: DesignSelections) -> Result<SharedDesign, AppError> {
        if self.designs.len() >= self.max_designs {
            warn!(stored = self.designs.len(), "Share storage is full");
            return Err(AppError::RateLimited(
                "Share storage is full, try again later".to_string(),
            ));
        }

        for attempt in 1..=self.max_attempts {
            let id = (self.generate_id)(self.id_length);
            match self.designs.entry(id.clone()) {
                Entry::Occupied(_) => {
                    warn!(attempt, "Share id collision, regenerating");
                }
                Entry::Vacant(slot) => {
                    let shared = SharedDesign {
                        id,
                        selections,
                        created_at: Utc::now(),
                    };
                    slot.insert(shared.clone());
                    crate::metrics::record_share_created();
                    info!(share_id = %shared.id, attempt, "Design snapshot shared");
                    return Ok(shared);
                }
            }
        }

        Err(AppError::InternalError(format!(
            "Could not allocate a unique share id after {} attempts",
            self.max_attempts
        )))
    }

    pub fn get(&self, id: &str) -> Result<SharedDesign, AppError> {
        self.designs
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("Shared design '{}'", id)))
    }

    /// Drop snapshots created before `cutoff`; returns how many were removed
    pub fn purge_created_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.designs.len();
        self.designs.retain(|_, design| design.created_at >= cutoff);
        before.saturating_sub(self.designs.len())
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }
}
