//! Field-level checks for catalog items.

use validator::{Validate, ValidationError};

use crate::errors::InvalidItem;
use crate::models::{NewCatalogItem, Resolution};

/// A promotion percentage only means something while the item is on promotion.
pub(crate) fn validate_promotion(item: &NewCatalogItem) -> Result<(), ValidationError> {
    if !item.on_promotion && item.promotion_percent != 0 {
        let mut err = ValidationError::new("promotion_without_flag");
        err.message = Some("promotionPercent must be 0 when onPromotion is false".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_resolution(resolution: &str) -> Result<(), ValidationError> {
    resolution
        .parse::<Resolution>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("resolution_format"))
}

/// Validates a single item, tagging failures with its brand and model.
pub fn validate_item(item: &NewCatalogItem) -> Result<(), InvalidItem> {
    item.validate().map_err(|source| InvalidItem {
        brand: item.brand.clone(),
        model: item.model.clone(),
        source,
    })
}
