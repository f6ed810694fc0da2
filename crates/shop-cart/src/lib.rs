//! Cart state for the storefront.
//!
//! [`CartManager`] keeps the shopper's cart in sync with the commerce
//! service: it persists the cart id locally, serializes mutations and
//! publishes immutable [`CartSnapshot`]s through a watch channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_cache::Cache;
//! use shop_cart::CartManager;
//! use shop_commerce::{RegionId, VariantId};
//! use shop_data::{StoreClient, StoreConfig};
//!
//! let client = StoreClient::new(StoreConfig::local()?)?;
//! let cart = CartManager::new(client, Cache::in_memory(), RegionId::new("reg_eu"));
//!
//! cart.load().await?;
//! let snapshot = cart.add_item(&VariantId::new("variant_01"), 1).await?;
//! assert!(snapshot.is_open);
//! ```

mod config;
mod error;
mod manager;
mod notice;
mod snapshot;

pub use config::{
    CartSection, ConfigError, StorageSection, StoreSection, StorefrontConfig, CONFIG_FILE_NAMES,
};
pub use error::CartError;
pub use manager::{CartManager, DEFAULT_CART_KEY};
pub use notice::{CartNotice, Mutation};
pub use snapshot::CartSnapshot;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CartError, CartManager, CartNotice, CartSnapshot, StorefrontConfig};
}
