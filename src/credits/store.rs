use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whose balance an operation applies to
///
/// Signed-in users are keyed by their user id; anonymous visitors by a device id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum CreditOwner {
    Device(String),
    User(String),
}

impl CreditOwner {
    pub fn kind(&self) -> &'static str {
        match self {
            CreditOwner::Device(_) => "device",
            CreditOwner::User(_) => "user",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CreditOwner::Device(id) | CreditOwner::User(id) => id,
        }
    }
}

impl fmt::Display for CreditOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.kind(),
            crate::logging::SensitiveValue::new(self.id())
        )
    }
}

/// Persistent credit balances
#[async_trait]
pub trait CreditStore: Send + Sync {
    /// Current balance; unknown owners report the starting allowance without being stored
    async fn get_credits(&self, owner: &CreditOwner) -> Result<u32, AppError>;

    /// Consume one credit and return the remaining balance
    async fn use_credit(&self, owner: &CreditOwner) -> Result<u32, AppError>;

    /// Add purchased credits and return the new balance
    async fn add_credits(&self, owner: &CreditOwner, amount: u32) -> Result<u32, AppError>;
}

/// Process-local store
pub struct InMemoryCreditStore {
    balances: DashMap<CreditOwner, u32>,
    initial_credits: u32,
}

impl InMemoryCreditStore {
    pub fn new(initial_credits: u32) -> Self {
        Self {
            balances: DashMap::new(),
            initial_credits,
        }
    }

    pub fn owner_count(&self) -> usize {
        self.balances.len()
    }
}

#[async_trait]
impl CreditStore for InMemoryCreditStore {
    async fn get_credits(&self, owner: &CreditOwner) -> Result<u32, AppError> {
        Ok(self
            .balances
            .get(owner)
            .map(|balance| *balance)
            .unwrap_or(self.initial_credits))
    }

    async fn use_credit(&self, owner: &CreditOwner) -> Result<u32, AppError> {
        let mut balance = self
            .balances
            .entry(owner.clone())
            .or_insert(self.initial_credits);

        if *balance == 0 {
            return Err(AppError::InsufficientCredits);
        }
        *balance -= 1;
        Ok(*balance)
    }

    async fn add_credits(&self, owner: &CreditOwner, amount: u32) -> Result<u32, AppError> {
        let mut balance = self
            .balances
            .entry(owner.clone())
            .or_insert(self.initial_credits);

        *balance = balance.saturating_add(amount);
        Ok(*balance)
    }
}
