//! Catalog storage backends.
//!
//! A catalog is a named grouping of [`CatalogItem`]s inside one database: a
//! table for [`PgCatalogStore`], a map entry for [`MemoryCatalogStore`].

mod memory;
mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::{CatalogItem, ItemKey};

pub use memory::MemoryCatalogStore;
pub use postgres::{PgCatalogStore, ensure_database};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Create the catalog if it does not exist yet.
    async fn ensure_catalog(&self, catalog: &str) -> Result<(), StoreError>;

    /// Write all items in one request. Either every item is stored or none is.
    async fn insert_many(&self, catalog: &str, items: &[CatalogItem]) -> Result<u64, StoreError>;

    async fn count(&self, catalog: &str) -> Result<u64, StoreError>;

    /// All items in the catalog, oldest first.
    async fn list(&self, catalog: &str) -> Result<Vec<CatalogItem>, StoreError>;

    /// Brand + model pairs already present in the catalog.
    async fn existing_keys(&self, catalog: &str) -> Result<HashSet<ItemKey>, StoreError>;
}

/// Catalog names double as SQL identifiers, so only `[A-Za-z_][A-Za-z0-9_]*` is accepted.
pub fn validate_catalog_name(name: &str) -> Result<(), StoreError> {
    if is_plain_identifier(name) {
        Ok(())
    } else {
        Err(StoreError::InvalidCatalogName(name.to_string()))
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, at most 63 bytes (PostgreSQL's identifier limit).
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    valid && name.len() <= 63
}
