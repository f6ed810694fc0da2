//! Inventory records and stock derivation.

use crate::catalog::ProductVariant;
use serde::{Deserialize, Serialize};

/// An inventory item linked to a variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct InventoryRecord {
    /// Inventory item identifier.
    pub inventory_item_id: Option<String>,
    /// Stock per stock location.
    pub location_levels: Vec<LocationLevel>,
}

impl InventoryRecord {
    /// A record with a single location holding `available` units.
    pub fn single_location(available: i64) -> Self {
        Self {
            inventory_item_id: None,
            location_levels: vec![LocationLevel {
                location_id: None,
                available_quantity: available,
            }],
        }
    }
}

/// Stock held at one location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LocationLevel {
    /// Stock location identifier.
    pub location_id: Option<String>,
    /// Units available for sale.
    pub available_quantity: i64,
}

/// Available stock for a variant.
///
/// Reads the first inventory record's first location. Any missing link in
/// that chain yields zero.
pub fn resolve_inventory(variant: &ProductVariant) -> i64 {
    variant
        .inventory
        .first()
        .and_then(|record| record.location_levels.first())
        .map(|level| level.available_quantity)
        .unwrap_or(0)
}
