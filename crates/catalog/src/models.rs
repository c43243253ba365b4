//! Catalog record types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_promotion, validate_resolution};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A product record as written by a seed file, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_promotion"))]
pub struct NewCatalogItem {
    pub brand: String,
    pub model: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock_quantity: i32,
    pub color: String,
    #[validate(url)]
    pub image_url: String,
    #[validate(nested)]
    pub display: Display,
    #[validate(range(min = 1))]
    pub ram_gigabytes: i32,
    #[validate(range(min = 1))]
    pub storage_gigabytes: i32,
    #[validate(nested)]
    pub camera: Camera,
    #[validate(range(min = 1))]
    pub battery_milliamp_hours: i32,
    pub operating_system: String,
    pub processor: String,
    #[serde(with = "iso_date")]
    pub release_date: Date,
    pub on_promotion: bool,
    #[validate(range(min = 0, max = 100))]
    pub promotion_percent: i32,
}

impl NewCatalogItem {
    pub fn key(&self) -> ItemKey {
        ItemKey {
            brand: self.brand.clone(),
            model: self.model.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Display {
    #[validate(range(exclusive_min = 0.0))]
    pub size_inches: f64,
    #[validate(custom(function = "validate_resolution"))]
    pub resolution: String,
    pub panel_type: String,
}

impl Display {
    /// Parsed form of the `"WxH"` resolution string.
    pub fn parsed_resolution(&self) -> Result<Resolution, ResolutionParseError> {
        self.resolution.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    #[validate(range(exclusive_min = 0.0))]
    pub main_megapixels: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub front_megapixels: f64,
}

/// A stored catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: Uuid,
    #[serde(flatten)]
    pub item: NewCatalogItem,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl CatalogItem {
    /// Assigns a fresh id and stamps both timestamps with `inserted_at`.
    pub fn new(item: NewCatalogItem, inserted_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            item,
            created_at: inserted_at,
            updated_at: inserted_at,
        }
    }

    pub fn key(&self) -> ItemKey {
        self.item.key()
    }
}

/// Current UTC time truncated to microseconds, the precision of `TIMESTAMPTZ`.
pub fn timestamp_now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

/// Brand + model pair used to detect an item that is already in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub brand: String,
    pub model: String,
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.brand, self.model)
    }
}

/// Screen resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid resolution {0:?}, expected WIDTHxHEIGHT")]
pub struct ResolutionParseError(pub String);

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolutionParseError(s.to_string());
        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use time::macros::date;

    pub(crate) fn sample_item() -> NewCatalogItem {
        NewCatalogItem {
            brand: "Samsung".to_string(),
            model: "Galaxy S23 Ultra".to_string(),
            price: 1259.0,
            stock_quantity: 25,
            color: "Noir".to_string(),
            image_url: "https://images.samsung.com/is/image/samsung/p6pim/fr/2302/gallery/fr-galaxy-s23-s918-sm-s918bzkgeub-534866917".to_string(),
            display: Display {
                size_inches: 6.8,
                resolution: "1440x3088".to_string(),
                panel_type: "Dynamic AMOLED 2X".to_string(),
            },
            ram_gigabytes: 12,
            storage_gigabytes: 512,
            camera: Camera {
                main_megapixels: 200.0,
                front_megapixels: 12.0,
            },
            battery_milliamp_hours: 5000,
            operating_system: "Android".to_string(),
            processor: "Snapdragon 8 Gen 2".to_string(),
            release_date: date!(2023 - 02 - 01),
            on_promotion: true,
            promotion_percent: 10,
        }
    }

    #[test]
    fn test_parse_resolution() {
        let res: Resolution = "1440x3088".parse().unwrap();
        assert_eq!(res.width, 1440);
        assert_eq!(res.height, 3088);
        assert_eq!(res.to_string(), "1440x3088");
    }

    #[test]
    fn test_parse_resolution_rejects_garbage() {
        assert!("1440".parse::<Resolution>().is_err());
        assert!("0x3088".parse::<Resolution>().is_err());
        assert!("wide x tall".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_new_item_timestamps_match() {
        let now = timestamp_now();
        let item = CatalogItem::new(sample_item(), now);
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(item.created_at.nanosecond() % 1_000, 0);
        assert_ne!(item.created_at.date(), item.item.release_date);
    }

    #[test]
    fn test_new_items_get_distinct_ids() {
        let now = timestamp_now();
        let a = CatalogItem::new(sample_item(), now);
        let b = CatalogItem::new(sample_item(), now);
        assert_ne!(a.id, b.id);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = serde_json::json!({
            "brand": "Google",
            "model": "Pixel 8 Pro",
            "price": 999,
            "stockQuantity": 15,
            "color": "Porcelain",
            "imageUrl": "https://example.com/pixel.webp",
            "display": { "sizeInches": 6.7, "resolution": "1344x2992", "panelType": "LTPO OLED" },
            "ramGigabytes": 12,
            "storageGigabytes": 256,
            "camera": { "mainMegapixels": 50, "frontMegapixels": 10.5 },
            "batteryMilliampHours": 5050,
            "operatingSystem": "Android",
            "processor": "Google Tensor G3",
            "releaseDate": "2023-10-01",
            "onPromotion": true,
            "promotionPercent": 15
        });

        let item: NewCatalogItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.price, 999.0);
        assert_eq!(item.camera.front_megapixels, 10.5);
        assert_eq!(item.release_date, date!(2023 - 10 - 01));
        assert_eq!(
            item.display.parsed_resolution().unwrap(),
            Resolution {
                width: 1344,
                height: 2992
            }
        );
    }
}
