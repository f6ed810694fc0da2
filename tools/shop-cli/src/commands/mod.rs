//! CLI command implementations.

pub mod cart;
pub mod product;
pub mod products;
pub mod regions;

use clap::{Args, Subcommand};

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product handle.
    pub handle: String,

    /// Color to select.
    #[arg(long)]
    pub color: Option<String>,

    /// Material to select.
    #[arg(long)]
    pub material: Option<String>,

    /// Region to price in (default: configured region).
    #[arg(short, long)]
    pub region: Option<String>,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Show at most N products.
    #[arg(short, long, default_value = "12")]
    pub limit: u32,

    /// Region to price in (default: configured region).
    #[arg(short, long)]
    pub region: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,

    /// Region new carts are created in (default: configured region).
    #[arg(short, long, global = true)]
    pub region: Option<String>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,
    /// Add a variant to the cart.
    Add {
        /// Variant ID.
        variant: String,
        /// Quantity (values below 1 are raised to 1).
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Change a line item's quantity.
    Update {
        /// Line item ID.
        line: String,
        /// New quantity (values below 1 are raised to 1).
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line item.
    Remove {
        /// Line item ID.
        line: String,
    },
    /// Show the cart panel.
    Open,
    /// Forget the stored cart id.
    Forget,
}
