//! Declarative seed data.
//!
//! Fixtures are JSON arrays of [`NewCatalogItem`] objects with camelCase keys.
//! The smartphone catalog ships inside the binary; other files can be loaded
//! from disk.

use std::path::{Path, PathBuf};

use catalog::NewCatalogItem;
use thiserror::Error;
use tracing::debug;

/// The smartphone records seeded by default.
pub const BUILTIN_SMARTPHONES: &str = include_str!("../data/smartphones.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed fixture: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_fixture(json: &str) -> Result<Vec<NewCatalogItem>, FixtureError> {
    Ok(serde_json::from_str(json)?)
}

pub fn builtin_smartphones() -> Result<Vec<NewCatalogItem>, FixtureError> {
    parse_fixture(BUILTIN_SMARTPHONES)
}

pub fn load_fixture(path: &Path) -> Result<Vec<NewCatalogItem>, FixtureError> {
    let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_fixture(&json)?;
    debug!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::validation::validate_item;
    use time::macros::date;

    #[test]
    fn test_builtin_smartphones() {
        let phones = builtin_smartphones().unwrap();
        assert_eq!(phones.len(), 3);

        let models: Vec<&str> = phones.iter().map(|p| p.model.as_str()).collect();
        assert_eq!(models, ["Galaxy S23 Ultra", "iPhone 15 Pro", "Pixel 8 Pro"]);
    }

    #[test]
    fn test_builtin_values() {
        let phones = builtin_smartphones().unwrap();

        let iphone = &phones[1];
        assert_eq!(iphone.brand, "Apple");
        assert_eq!(iphone.price, 1229.0);
        assert_eq!(iphone.stock_quantity, 30);
        assert_eq!(iphone.battery_milliamp_hours, 3274);
        assert_eq!(iphone.release_date, date!(2023 - 09 - 01));
        assert!(!iphone.on_promotion);
        assert_eq!(iphone.promotion_percent, 0);

        let pixel = &phones[2];
        assert_eq!(pixel.camera.front_megapixels, 10.5);
        assert_eq!(pixel.display.panel_type, "LTPO OLED");
        assert_eq!(pixel.promotion_percent, 15);
    }

    #[test]
    fn test_builtin_smartphones_are_valid() {
        for phone in builtin_smartphones().unwrap() {
            validate_item(&phone).unwrap();
        }
    }

    #[test]
    fn test_malformed_fixture() {
        let err = parse_fixture(r#"[{"brand": "Nokia"}]"#).unwrap_err();
        assert!(matches!(err, FixtureError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_fixture(Path::new("/nonexistent/phones.json")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
