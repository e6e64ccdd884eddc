//! Per-owner credit balances
//!
//! One credit pays for one AI visualization. Balances live in a [`CreditStore`] and are read
//! through a TTL-bounded [`CreditCache`].

pub mod cache;
pub mod service;
pub mod store;

pub use cache::{CacheEntry, CreditCache};
pub use service::CreditService;
pub use store::{CreditOwner, CreditStore, InMemoryCreditStore};
