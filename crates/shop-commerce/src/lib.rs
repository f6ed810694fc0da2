//! Storefront domain types and derivations.
//!
//! This crate holds the strict data model the storefront works with once a
//! commerce API payload has been validated:
//!
//! - **Catalog**: Products, options, variants, price entries, inventory
//! - **Resolution**: Option extraction, variant lookup, price and stock derivation
//! - **Cart**: Remote cart snapshots with line items and totals
//!
//! Everything here is pure: no I/O, no clocks, no global state.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_commerce::prelude::*;
//!
//! let options = extract_options(&product);
//! let mut selections = default_selections(&product);
//! selections.select(OptionAxis::Color, "White");
//!
//! if let Some(variant) = find_variant(&product, &selections) {
//!     let price = resolve_price(variant, &RegionId::new("reg_eu"));
//!     println!("{} ({} in stock)", price.calculated, resolve_inventory(variant));
//! }
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use cart::{Cart, LineItem};
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        default_selections, display_variant, extract_options, find_variant, resolve_inventory,
        resolve_price, resolve_view, InventoryRecord, LocationLevel, OptionAxis, PriceEntry,
        PriceInfo, Product, ProductOption, ProductOptions, ProductVariant, ProductView,
        Selections, VariantOption,
    };

    // Cart
    pub use crate::cart::{Cart, LineItem};
}
