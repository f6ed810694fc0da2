//! Store API types that have no home in the domain crate.

use serde::{Deserialize, Serialize};
use shop_commerce::{Currency, RegionId};

/// A selling region: a currency plus the countries it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub currency: Currency,
    /// ISO 3166-1 alpha-2 codes, lowercase as the service reports them.
    pub countries: Vec<String>,
}

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}

/// Filters for product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Only the product with this handle.
    pub handle: Option<String>,
    /// Region used for calculated prices.
    pub region_id: Option<RegionId>,
    /// Page size.
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    pub fn region(mut self, region_id: &RegionId) -> Self {
        self.region_id = Some(region_id.clone());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
