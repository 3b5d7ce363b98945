//! In-memory store with optional JSON file persistence

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{
    Asset, DateOrder, NewTransaction, Profile, Transaction, TransactionPatch, TransactionQuery,
};
use crate::{AssetStore, ProfileStore, TransactionStore};

/// On-disk document
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

pub struct MemoryStore {
    data: RwLock<StoreData>,
    path: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Volatile store, nothing is written to disk
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            path: None,
        }
    }

    /// Store mirrored to `path`; loads the file if it already exists
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let data = read_document(&path).await?;
        log::info!(
            "Store opened at {} ({} transactions, {} assets, {} profiles)",
            path.display(),
            data.transactions.len(),
            data.assets.len(),
            data.profiles.len()
        );
        Ok(Self {
            data: RwLock::new(data),
            path: Some(path),
        })
    }

    /// Insert or replace profiles by id
    pub async fn upsert_profiles(&self, profiles: Vec<Profile>) -> Result<(), StoreError> {
        self.commit(|data| {
            for profile in profiles {
                match data.profiles.iter_mut().find(|p| p.id == profile.id) {
                    Some(existing) => {
                        existing.email = profile.email;
                        // a name chosen through the profile endpoint wins
                        if existing.full_name.is_none() {
                            existing.full_name = profile.full_name;
                        }
                        existing.role = profile.role;
                        existing.updated_at = Some(Utc::now());
                    }
                    None => data.profiles.push(profile),
                }
            }
            Some(())
        })
        .await
        .map(|_| ())
    }

    /// Register a fixed asset
    pub async fn add_asset(&self, asset: Asset) -> Result<(), StoreError> {
        self.commit(|data| {
            data.assets.push(asset);
            Some(())
        })
        .await
        .map(|_| ())
    }

    /// Apply `change` to a copy of the document and keep it only once it is
    /// on disk. `change` returns `None` when there is nothing to write.
    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> Option<T>,
    ) -> Result<Option<T>, StoreError> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let Some(outcome) = change(&mut next) else {
            return Ok(None);
        };
        self.persist(&next).await?;
        *data = next;
        Ok(Some(outcome))
    }

    /// Write to a sibling temp file, then rename it over the store file
    async fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(data)?;
        let staging = staging_path(path);
        let written = match tokio::fs::write(&staging, content).await {
            Ok(()) => tokio::fs::rename(&staging, path).await,
            Err(e) => Err(e),
        };
        written.map_err(|e| {
            log::error!("Failed to write store file {}: {}", path.display(), e);
            StoreError::IoError(e)
        })
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn read_document(path: &Path) -> Result<StoreData, StoreError> {
    if !tokio::fs::try_exists(path).await? {
        log::warn!("Store file not found, starting empty: {}", path.display());
        return Ok(StoreData::default());
    }
    let content = tokio::fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(StoreData::default());
    }
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, StoreError> {
        let data = self.data.read().await;
        let mut transactions: Vec<Transaction> = data
            .transactions
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();

        match query.order {
            DateOrder::Descending => transactions.sort_by(|a, b| {
                b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at))
            }),
            DateOrder::Ascending => transactions.sort_by(|a, b| {
                a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at))
            }),
        }

        let paged = transactions.into_iter().skip(query.offset);
        Ok(match query.limit {
            Some(limit) => paged.take(limit).collect(),
            None => paged.collect(),
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Transaction>, StoreError> {
        let data = self.data.read().await;
        Ok(data.transactions.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, records: Vec<NewTransaction>) -> Result<Vec<Transaction>, StoreError> {
        let now = Utc::now();
        let created: Vec<Transaction> = records
            .into_iter()
            .map(|r| Transaction {
                id: uuid::Uuid::new_v4().to_string(),
                date: r.date,
                category: r.category,
                description: r.description,
                income: r.income,
                expense: r.expense,
                account: r.account,
                notes: r.notes,
                user_id: r.user_id,
                created_at: now,
                updated_at: None,
            })
            .collect();
        self.commit(|data| {
            data.transactions.extend(created.iter().cloned());
            Some(())
        })
        .await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>, StoreError> {
        self.commit(|data| {
            let tx = data.transactions.iter_mut().find(|t| t.id == id)?;
            patch.apply(tx);
            tx.updated_at = Some(Utc::now());
            Some(tx.clone())
        })
        .await
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        let removed = self
            .commit(|data| {
                let before = data.transactions.len();
                data.transactions.retain(|t| !ids.contains(&t.id));
                let removed = before - data.transactions.len();
                (removed > 0).then_some(removed)
            })
            .await?;
        Ok(removed.unwrap_or(0))
    }

    async fn delete_matching(&self, query: &TransactionQuery) -> Result<usize, StoreError> {
        let removed = self
            .commit(|data| {
                let before = data.transactions.len();
                data.transactions.retain(|t| !query.matches(t));
                let removed = before - data.transactions.len();
                (removed > 0).then_some(removed)
            })
            .await?;
        Ok(removed.unwrap_or(0))
    }

    async fn reload(&self) -> Result<usize, StoreError> {
        let mut data = self.data.write().await;
        if let Some(path) = &self.path {
            *data = read_document(path).await?;
            log::info!(
                "Store reloaded from {} ({} transactions)",
                path.display(),
                data.transactions.len()
            );
        }
        Ok(data.transactions.len())
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn assets_through(&self, date: NaiveDate) -> Result<Vec<Asset>, StoreError> {
        let data = self.data.read().await;
        Ok(data
            .assets
            .iter()
            .filter(|a| a.purchase_date <= date)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let data = self.data.read().await;
        Ok(data.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn rename_profile(
        &self,
        id: &str,
        full_name: String,
    ) -> Result<Option<Profile>, StoreError> {
        self.commit(|data| {
            let profile = data.profiles.iter_mut().find(|p| p.id == id)?;
            profile.full_name = Some(full_name);
            profile.updated_at = Some(Utc::now());
            Some(profile.clone())
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                    Err(StoreError::Unavailable {
                        message: format!("data directory missing: {}", dir.display()),
                    })
                }
                _ => Ok(()),
            },
            None => Ok(()),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Role};
    use rust_decimal::Decimal;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(d: &str, category: Category, income: i64, expense: i64) -> NewTransaction {
        NewTransaction {
            date: date(d),
            category,
            description: format!("{} on {}", category, d),
            income: Decimal::from(income),
            expense: Decimal::from(expense),
            account: "BCA".to_string(),
            notes: None,
            user_id: Some("u1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = MemoryStore::new();
        let created = store
            .insert(vec![
                record("2025-01-10", Category::Earn, 100, 0),
                record("2025-01-11", Category::Opex, 0, 40),
            ])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert!(store.get(&created[0].id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_query_orders_and_pages() {
        let store = MemoryStore::new();
        store
            .insert(vec![
                record("2025-03-01", Category::Earn, 1, 0),
                record("2025-01-01", Category::Earn, 2, 0),
                record("2025-02-01", Category::Opex, 0, 3),
            ])
            .await
            .unwrap();

        let desc = store.query(&TransactionQuery::default()).await.unwrap();
        let dates: Vec<_> = desc.iter().map(|t| t.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-02-01", "2025-01-01"]);

        let asc = store
            .query(&TransactionQuery::default().ascending().page(Some(1), 1))
            .await
            .unwrap();
        assert_eq!(asc.len(), 1);
        assert_eq!(asc[0].date, date("2025-02-01"));

        let earn = store
            .query(&TransactionQuery::default().with_category(Category::Earn))
            .await
            .unwrap();
        assert_eq!(earn.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let created = store
            .insert(vec![record("2025-01-10", Category::Opex, 0, 40)])
            .await
            .unwrap();
        let id = created[0].id.clone();

        let updated = store
            .update(
                &id,
                TransactionPatch {
                    expense: Some(Decimal::from(55)),
                    ..TransactionPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.expense, Decimal::from(55));
        assert!(updated.updated_at.is_some());

        assert!(store
            .update("missing", TransactionPatch::default())
            .await
            .unwrap()
            .is_none());

        assert_eq!(store.delete(&[id.clone()]).await.unwrap(), 1);
        assert_eq!(store.delete(&[id]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_matching_respects_filters() {
        let store = MemoryStore::new();
        store
            .insert(vec![
                record("2024-05-01", Category::Opex, 0, 10),
                record("2025-05-01", Category::Opex, 0, 10),
                record("2025-05-02", Category::Earn, 10, 0),
            ])
            .await
            .unwrap();

        let query = TransactionQuery::between(date("2025-01-01"), date("2025-12-31"))
            .with_category(Category::Opex);
        assert_eq!(store.delete_matching(&query).await.unwrap(), 1);
        assert_eq!(store.query(&TransactionQuery::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_assets_through_date() {
        let store = MemoryStore::new();
        for (id, d) in [("a1", "2024-06-01"), ("a2", "2026-02-01")] {
            store
                .add_asset(Asset {
                    id: id.to_string(),
                    item_name: "AC unit".to_string(),
                    asset_type: "equipment".to_string(),
                    purchase_date: date(d),
                    purchase_price: Decimal::from(5_000_000),
                    quantity: Decimal::ONE,
                    status: "active".to_string(),
                })
                .await
                .unwrap();
        }
        let assets = store.assets_through(date("2025-12-31")).await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, "a1");
    }

    #[tokio::test]
    async fn test_upsert_profiles_replaces_role() {
        let store = MemoryStore::new();
        let profile = Profile {
            id: "u1".to_string(),
            email: "a@b.c".to_string(),
            full_name: None,
            role: Role::Viewer,
            created_at: Utc::now(),
            updated_at: None,
        };
        store.upsert_profiles(vec![profile.clone()]).await.unwrap();
        store
            .upsert_profiles(vec![Profile {
                role: Role::Operator,
                ..profile
            }])
            .await
            .unwrap();

        let found = store.profile("u1").await.unwrap().unwrap();
        assert_eq!(found.role, Role::Operator);
        assert!(store.profile("u2").await.unwrap().is_none());

        let renamed = store
            .rename_profile("u1", "Dewi".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.full_name.as_deref(), Some("Dewi"));
        assert_eq!(renamed.role, Role::Operator);
        assert!(store
            .rename_profile("u2", "Nobody".to_string())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = MemoryStore::open(path.clone()).await.unwrap();
        store
            .insert(vec![record("2025-06-15", Category::Earn, 5_000_000, 0)])
            .await
            .unwrap();
        assert!(path.exists());
        assert!(!staging_path(&path).exists());

        let reopened = MemoryStore::open(path.clone()).await.unwrap();
        let all = reopened.query(&TransactionQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].income, Decimal::from(5_000_000));

        store.delete(&[all[0].id.clone()]).await.unwrap();
        assert_eq!(reopened.reload().await.unwrap(), 0);
        assert!(reopened
            .query(&TransactionQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_data_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        let store = MemoryStore::open(blocker.join("store.json")).await.unwrap();
        let kept = store
            .insert(vec![record("2025-06-01", Category::Opex, 0, 40)])
            .await
            .unwrap();
        let id = kept[0].id.clone();

        std::fs::remove_dir_all(&blocker).unwrap();
        std::fs::write(&blocker, "not a directory").unwrap();

        assert!(store
            .insert(vec![record("2025-06-15", Category::Earn, 5_000_000, 0)])
            .await
            .is_err());
        assert!(store
            .update(
                &id,
                TransactionPatch {
                    expense: Some(Decimal::from(99)),
                    ..TransactionPatch::default()
                },
            )
            .await
            .is_err());
        assert!(store.delete(&[id.clone()]).await.is_err());

        let all = store.query(&TransactionQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].expense, Decimal::from(40));
        assert!(all[0].updated_at.is_none());
    }

    #[test]
    fn test_staging_path_is_a_sibling() {
        let path = PathBuf::from("/srv/cashbook/store.json");
        assert_eq!(
            staging_path(&path),
            PathBuf::from("/srv/cashbook/store.json.tmp")
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = MemoryStore::open(path).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
