//! Product catalog module.
//!
//! Contains the product model and the pure derivations over it: recognized
//! option axes, variant lookup, display price and available stock. None of
//! these accessors fail; missing data degrades to empty, zero or `None`.

mod inventory;
mod options;
mod pricing;
mod product;
mod resolver;

pub use inventory::{resolve_inventory, InventoryRecord, LocationLevel};
pub use options::{extract_options, OptionAxis, ProductOptions};
pub use pricing::{resolve_price, PriceInfo};
pub use product::{PriceEntry, Product, ProductOption, ProductVariant, VariantOption, REGION_RULE};
pub use resolver::{
    default_selections, display_variant, find_variant, resolve_view, ProductView, Selections,
};
