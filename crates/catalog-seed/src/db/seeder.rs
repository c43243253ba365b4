//! Catalog seeding.

use std::io::Write;

use catalog::validation::validate_item;
use catalog::{CatalogItem, CatalogStore, InvalidItem, NewCatalogItem, StoreError};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{DEFAULT_CATALOG, SeedMode};
use crate::fixtures::FixtureError;

/// Printed to stdout once the catalog has been written.
pub const COMPLETION_MESSAGE: &str = "Base de données smartphones initialisée avec succès !";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    InvalidItem(#[from] InvalidItem),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error("Store wrote {inserted} of {expected} items")]
    IncompleteInsert { expected: usize, inserted: u64 },
    #[error("Failed to write completion notice: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a seeding run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub catalog: String,
    pub inserted_ids: Vec<Uuid>,
    /// Items left out because their brand and model were already present.
    pub skipped: usize,
}

impl SeedReport {
    pub fn inserted(&self) -> usize {
        self.inserted_ids.len()
    }
}

/// Writes fixture items into a catalog through an explicit store handle.
pub struct Seeder<S> {
    store: S,
    catalog: String,
    mode: SeedMode,
    validate: bool,
}

impl<S: CatalogStore> Seeder<S> {
    /// Creates a seeder targeting the default `smartphones` catalog.
    pub fn new(store: S) -> Self {
        Self {
            store,
            catalog: DEFAULT_CATALOG.to_string(),
            mode: SeedMode::Append,
            validate: true,
        }
    }

    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = catalog.into();
        self
    }

    pub fn with_mode(mut self, mode: SeedMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Inserts `items` in a single bulk write, stamping `created_at` and `updated_at`
    /// with the same insertion time.
    pub async fn seed(&self, items: &[NewCatalogItem]) -> Result<SeedReport, SeedError> {
        info!("Seeding {} items into {}...", items.len(), self.catalog);

        if self.validate {
            for item in items {
                validate_item(item)?;
            }
        }

        self.store.ensure_catalog(&self.catalog).await?;

        let pending: Vec<&NewCatalogItem> = match self.mode {
            SeedMode::Append => items.iter().collect(),
            SeedMode::SkipExisting => {
                let mut seen = self.store.existing_keys(&self.catalog).await?;
                items
                    .iter()
                    .filter(|item| {
                        let fresh = seen.insert(item.key());
                        if !fresh {
                            warn!("Skipping {}: already in {}", item.key(), self.catalog);
                        }
                        fresh
                    })
                    .collect()
            }
        };
        let skipped = items.len() - pending.len();

        let inserted_at = catalog::models::timestamp_now();
        let records: Vec<CatalogItem> = pending
            .into_iter()
            .map(|item| CatalogItem::new(item.clone(), inserted_at))
            .collect();

        if !records.is_empty() {
            let inserted = self.store.insert_many(&self.catalog, &records).await?;
            if inserted != records.len() as u64 {
                return Err(SeedError::IncompleteInsert {
                    expected: records.len(),
                    inserted,
                });
            }
        }

        info!(
            "Seeded {} items into {} ({} skipped)",
            records.len(),
            self.catalog,
            skipped
        );

        Ok(SeedReport {
            catalog: self.catalog.clone(),
            inserted_ids: records.iter().map(|r| r.id).collect(),
            skipped,
        })
    }

    /// Seeds `items`, then writes [`COMPLETION_MESSAGE`] to `out`. Nothing is written
    /// when seeding fails.
    pub async fn seed_and_announce(
        &self,
        items: &[NewCatalogItem],
        out: &mut impl Write,
    ) -> Result<SeedReport, SeedError> {
        let report = self.seed(items).await?;
        writeln!(out, "{COMPLETION_MESSAGE}")?;
        Ok(report)
    }
}
