use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid catalog name: {0:?}")]
    InvalidCatalogName(String),

    #[error("Invalid database name: {0:?}")]
    InvalidDatabaseName(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A catalog item that failed field validation.
#[derive(Error, Debug)]
#[error("Invalid catalog item {brand} {model}: {source}")]
pub struct InvalidItem {
    pub brand: String,
    pub model: String,
    pub source: validator::ValidationErrors,
}
