//! Persistent collections behind the cash book
//!
//! The report layer only sees the traits below; `MemoryStore` is the
//! shipped implementation (in memory, optionally mirrored to a JSON file).

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

pub mod error;
pub mod memory;
pub mod types;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use types::{
    Asset, Category, DateOrder, NewTransaction, Profile, Role, Transaction, TransactionPatch,
    TransactionQuery,
};

// ==================== Store Traits ====================

/// Transaction collection
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Transactions matching the query, ordered and paged as requested
    async fn query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, StoreError>;

    /// Single transaction by id
    async fn get(&self, id: &str) -> Result<Option<Transaction>, StoreError>;

    /// Insert records, assigning ids and creation timestamps
    async fn insert(&self, records: Vec<NewTransaction>) -> Result<Vec<Transaction>, StoreError>;

    /// Apply a patch; `None` if the id does not exist
    async fn update(
        &self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Delete by id, returning how many records were removed
    async fn delete(&self, ids: &[String]) -> Result<usize, StoreError>;

    /// Delete everything matching the query's date and category filters
    async fn delete_matching(&self, query: &TransactionQuery) -> Result<usize, StoreError>;

    /// Re-read the backing document, returning how many transactions it holds
    async fn reload(&self) -> Result<usize, StoreError>;
}

/// Fixed asset register
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Assets purchased on or before the given date
    async fn assets_through(&self, date: NaiveDate) -> Result<Vec<Asset>, StoreError>;
}

/// User profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    /// Change the display name; `None` if the profile does not exist
    async fn rename_profile(
        &self,
        id: &str,
        full_name: String,
    ) -> Result<Option<Profile>, StoreError>;

    /// Cheap connectivity check
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Store reference types
pub type TransactionStoreRef = Arc<dyn TransactionStore>;
pub type AssetStoreRef = Arc<dyn AssetStore>;
pub type ProfileStoreRef = Arc<dyn ProfileStore>;
