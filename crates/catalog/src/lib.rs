//! Smartphone catalog storage.
//!
//! Holds the [`CatalogItem`](models::CatalogItem) record type, its field
//! validation, and the [`CatalogStore`](store::CatalogStore) implementations
//! used to write catalogs to PostgreSQL or to memory.

pub mod errors;
pub mod models;
pub mod store;
pub mod validation;

pub use errors::{InvalidItem, StoreError};
pub use models::{Camera, CatalogItem, Display, ItemKey, NewCatalogItem, Resolution};
pub use store::{CatalogStore, MemoryCatalogStore, PgCatalogStore, ensure_database};
