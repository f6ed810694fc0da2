//! Store API client for the storefront.
//!
//! Talks to a Medusa-style commerce service over HTTP and validates its
//! loosely typed payloads into the strict `shop-commerce` model.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_data::{StoreApi, StoreClient, StoreConfig};
//! use shop_commerce::RegionId;
//!
//! let config = StoreConfig::new("http://localhost:9000")?
//!     .with_publishable_key("pk_...");
//! let client = StoreClient::new(config)?;
//!
//! let region = RegionId::new("reg_eu");
//! let cart = client.create_cart(&region).await?;
//! let product = client.get_product_by_handle("paloma-haven", &region).await?;
//! ```

mod client;
mod config;
mod error;
mod types;
mod wire;

pub use client::{StoreApi, StoreClient, PRODUCT_FIELDS, PUBLISHABLE_KEY_HEADER};
pub use config::{StoreConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::FetchError;
pub use types::{Deletion, ProductQuery, Region};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchError, ProductQuery, Region, StoreApi, StoreClient, StoreConfig};
}
