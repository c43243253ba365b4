use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::{Date, OffsetDateTime};
use tracing::{debug, info};
use uuid::Uuid;

use super::{CatalogStore, is_plain_identifier, validate_catalog_name};
use crate::errors::StoreError;
use crate::models::{Camera, CatalogItem, Display, ItemKey, NewCatalogItem};

const COLUMNS: &str = "id, brand, model, price, stock_quantity, color, image_url, \
     display_size_inches, display_resolution, display_panel_type, \
     ram_gigabytes, storage_gigabytes, camera_main_megapixels, camera_front_megapixels, \
     battery_milliamp_hours, operating_system, processor, release_date, \
     on_promotion, promotion_percent, created_at, updated_at";

const COLUMN_COUNT: usize = 22;

/// Postgres caps a statement at 65535 bind parameters.
const MAX_ROWS_PER_STATEMENT: usize = u16::MAX as usize / COLUMN_COUNT;

/// PostgreSQL-backed catalogs, one table per catalog.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Creates `database` on the server behind `maintenance` unless it already exists.
///
/// `maintenance` must be connected to some other database on the same server,
/// usually `postgres`. Returns whether the database was created.
pub async fn ensure_database(maintenance: &PgPool, database: &str) -> Result<bool, StoreError> {
    if !is_plain_identifier(database) {
        return Err(StoreError::InvalidDatabaseName(database.to_string()));
    }

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(database)
            .fetch_one(maintenance)
            .await?;
    if exists {
        debug!("Database {database} already exists");
        return Ok(false);
    }

    match sqlx::query(&format!("CREATE DATABASE \"{database}\""))
        .execute(maintenance)
        .await
    {
        Ok(_) => {
            info!("Created database {database}");
            Ok(true)
        }
        // duplicate_database: another process created it between the check and now
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("42P04") => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn table_name(catalog: &str) -> Result<String, StoreError> {
    validate_catalog_name(catalog)?;
    Ok(format!("\"{catalog}\""))
}

#[derive(Debug, FromRow)]
struct CatalogRow {
    id: Uuid,
    brand: String,
    model: String,
    price: f64,
    stock_quantity: i32,
    color: String,
    image_url: String,
    display_size_inches: f64,
    display_resolution: String,
    display_panel_type: String,
    ram_gigabytes: i32,
    storage_gigabytes: i32,
    camera_main_megapixels: f64,
    camera_front_megapixels: f64,
    battery_milliamp_hours: i32,
    operating_system: String,
    processor: String,
    release_date: Date,
    on_promotion: bool,
    promotion_percent: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CatalogRow> for CatalogItem {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            item: NewCatalogItem {
                brand: row.brand,
                model: row.model,
                price: row.price,
                stock_quantity: row.stock_quantity,
                color: row.color,
                image_url: row.image_url,
                display: Display {
                    size_inches: row.display_size_inches,
                    resolution: row.display_resolution,
                    panel_type: row.display_panel_type,
                },
                ram_gigabytes: row.ram_gigabytes,
                storage_gigabytes: row.storage_gigabytes,
                camera: Camera {
                    main_megapixels: row.camera_main_megapixels,
                    front_megapixels: row.camera_front_megapixels,
                },
                battery_milliamp_hours: row.battery_milliamp_hours,
                operating_system: row.operating_system,
                processor: row.processor,
                release_date: row.release_date,
                on_promotion: row.on_promotion,
                promotion_percent: row.promotion_percent,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ensure_catalog(&self, catalog: &str) -> Result<(), StoreError> {
        let table = table_name(catalog)?;
        debug!("Ensuring catalog table {table} exists");

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY,
                brand TEXT NOT NULL,
                model TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                stock_quantity INTEGER NOT NULL,
                color TEXT NOT NULL,
                image_url TEXT NOT NULL,
                display_size_inches DOUBLE PRECISION NOT NULL,
                display_resolution TEXT NOT NULL,
                display_panel_type TEXT NOT NULL,
                ram_gigabytes INTEGER NOT NULL,
                storage_gigabytes INTEGER NOT NULL,
                camera_main_megapixels DOUBLE PRECISION NOT NULL,
                camera_front_megapixels DOUBLE PRECISION NOT NULL,
                battery_milliamp_hours INTEGER NOT NULL,
                operating_system TEXT NOT NULL,
                processor TEXT NOT NULL,
                release_date DATE NOT NULL,
                on_promotion BOOLEAN NOT NULL,
                promotion_percent INTEGER NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_many(&self, catalog: &str, items: &[CatalogItem]) -> Result<u64, StoreError> {
        let table = table_name(catalog)?;
        if items.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chunk in items.chunks(MAX_ROWS_PER_STATEMENT) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new(format!("INSERT INTO {table} ({COLUMNS}) "));

            builder.push_values(chunk, |mut row, record| {
                let item = &record.item;
                row.push_bind(record.id)
                    .push_bind(&item.brand)
                    .push_bind(&item.model)
                    .push_bind(item.price)
                    .push_bind(item.stock_quantity)
                    .push_bind(&item.color)
                    .push_bind(&item.image_url)
                    .push_bind(item.display.size_inches)
                    .push_bind(&item.display.resolution)
                    .push_bind(&item.display.panel_type)
                    .push_bind(item.ram_gigabytes)
                    .push_bind(item.storage_gigabytes)
                    .push_bind(item.camera.main_megapixels)
                    .push_bind(item.camera.front_megapixels)
                    .push_bind(item.battery_milliamp_hours)
                    .push_bind(&item.operating_system)
                    .push_bind(&item.processor)
                    .push_bind(item.release_date)
                    .push_bind(item.on_promotion)
                    .push_bind(item.promotion_percent)
                    .push_bind(record.created_at)
                    .push_bind(record.updated_at);
            });

            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn count(&self, catalog: &str) -> Result<u64, StoreError> {
        let table = table_name(catalog)?;
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn list(&self, catalog: &str) -> Result<Vec<CatalogItem>, StoreError> {
        let table = table_name(catalog)?;
        let rows: Vec<CatalogRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM {table} ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }

    async fn existing_keys(&self, catalog: &str) -> Result<HashSet<ItemKey>, StoreError> {
        let table = table_name(catalog)?;
        let rows: Vec<(String, String)> =
            sqlx::query_as(&format!("SELECT DISTINCT brand, model FROM {table}"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(brand, model)| ItemKey { brand, model })
            .collect())
    }
}
