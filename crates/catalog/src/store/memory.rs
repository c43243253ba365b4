use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CatalogStore, validate_catalog_name};
use crate::errors::StoreError;
use crate::models::{CatalogItem, ItemKey};

/// In-process catalog store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    catalogs: Arc<RwLock<HashMap<String, Vec<CatalogItem>>>>,
    offline: bool,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every call, standing in for an unreachable server.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn check_online(&self, catalog: &str) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable(format!(
                "catalog {catalog} is not reachable"
            )));
        }
        validate_catalog_name(catalog)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ensure_catalog(&self, catalog: &str) -> Result<(), StoreError> {
        self.check_online(catalog)?;
        self.catalogs
            .write()
            .await
            .entry(catalog.to_string())
            .or_default();
        Ok(())
    }

    async fn insert_many(&self, catalog: &str, items: &[CatalogItem]) -> Result<u64, StoreError> {
        self.check_online(catalog)?;
        let mut catalogs = self.catalogs.write().await;
        catalogs
            .entry(catalog.to_string())
            .or_default()
            .extend_from_slice(items);
        Ok(items.len() as u64)
    }

    async fn count(&self, catalog: &str) -> Result<u64, StoreError> {
        self.check_online(catalog)?;
        let catalogs = self.catalogs.read().await;
        Ok(catalogs.get(catalog).map_or(0, |items| items.len() as u64))
    }

    async fn list(&self, catalog: &str) -> Result<Vec<CatalogItem>, StoreError> {
        self.check_online(catalog)?;
        let catalogs = self.catalogs.read().await;
        Ok(catalogs.get(catalog).cloned().unwrap_or_default())
    }

    async fn existing_keys(&self, catalog: &str) -> Result<HashSet<ItemKey>, StoreError> {
        self.check_online(catalog)?;
        let catalogs = self.catalogs.read().await;
        Ok(catalogs
            .get(catalog)
            .map(|items| items.iter().map(CatalogItem::key).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{tests::sample_item, timestamp_now};

    #[tokio::test]
    async fn test_insert_and_list() {
        let store = MemoryCatalogStore::new();
        let now = timestamp_now();
        let items = vec![
            CatalogItem::new(sample_item(), now),
            CatalogItem::new(sample_item(), now),
        ];

        store.ensure_catalog("smartphones").await.unwrap();
        assert_eq!(store.count("smartphones").await.unwrap(), 0);

        let inserted = store.insert_many("smartphones", &items).await.unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.list("smartphones").await.unwrap(), items);
        assert_eq!(store.existing_keys("smartphones").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryCatalogStore::new();
        let other = store.clone();
        let item = CatalogItem::new(sample_item(), timestamp_now());

        store.insert_many("smartphones", &[item]).await.unwrap();
        assert_eq!(other.count("smartphones").await.unwrap(), 1);
        assert_eq!(other.count("tablets").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = MemoryCatalogStore::offline();
        let err = store.ensure_catalog("smartphones").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_rejects_bad_catalog_name() {
        let store = MemoryCatalogStore::new();
        let err = store.count("bad name").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCatalogName(_)));
    }
}
