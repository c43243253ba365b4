//! Seeding for the smartphone catalog.
//!
//! Loads the smartphone fixtures and writes them into the `smartphones`
//! catalog of `smartphoneDB` with a single bulk insert.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use catalog_seed::prelude::*;
//!
//! let config = SeedConfig::from_env()?;
//! let store = catalog_seed::connect_store(&config).await?;
//! let report = Seeder::new(store)
//!     .with_mode(SeedMode::Append)
//!     .seed_and_announce(&builtin_smartphones()?, &mut std::io::stdout())
//!     .await?;
//! ```

pub mod config;
pub mod db;
pub mod fixtures;

use std::io::Write;

use catalog::{StoreError, ensure_database};
use sqlx::postgres::PgPoolOptions;

use crate::config::SeedConfig;
use crate::db::{SeedError, SeedReport};

pub use catalog::{CatalogItem, CatalogStore, MemoryCatalogStore, NewCatalogItem, PgCatalogStore};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{SeedConfig, SeedMode};
    pub use crate::db::{COMPLETION_MESSAGE, SeedError, SeedReport, Seeder};
    pub use crate::fixtures::{builtin_smartphones, load_fixture};
    pub use crate::{CatalogItem, CatalogStore, MemoryCatalogStore, NewCatalogItem, PgCatalogStore};
}

/// Opens a PostgreSQL store for the configured database, creating the database
/// first if the server does not have it yet.
pub async fn connect_store(config: &SeedConfig) -> Result<PgCatalogStore, StoreError> {
    let maintenance = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.connect_timeout)
        .connect_with(config.maintenance_connect_options()?)
        .await?;
    let ensured = ensure_database(&maintenance, &config.database).await;
    maintenance.close().await;
    ensured?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.connect_timeout)
        .connect_with(config.connect_options()?)
        .await?;

    Ok(PgCatalogStore::new(pool))
}

/// Loads the configured items and seeds them, writing the completion line to `out`
/// only after every item has been stored.
pub async fn run(config: &SeedConfig, out: &mut impl Write) -> Result<SeedReport, SeedError> {
    let items = load_items(config)?;
    let store = connect_store(config).await?;
    let seeder = seeder_from_config(store, config);

    let report = seeder.seed_and_announce(&items, out).await;
    seeder.store().pool().close().await;
    report
}

/// Builds a seeder from configuration around an already opened store.
pub fn seeder_from_config<S: CatalogStore>(store: S, config: &SeedConfig) -> db::Seeder<S> {
    db::Seeder::new(store)
        .with_catalog(config.catalog.clone())
        .with_mode(config.mode)
        .with_validation(config.validate)
}

/// Items to seed: the configured fixture file, or the built-in smartphones.
pub fn load_items(config: &SeedConfig) -> Result<Vec<NewCatalogItem>, fixtures::FixtureError> {
    match &config.data_file {
        Some(path) => fixtures::load_fixture(path),
        None => fixtures::builtin_smartphones(),
    }
}
