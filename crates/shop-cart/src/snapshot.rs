//! Immutable views of cart state.

use std::sync::Arc;

use shop_commerce::Cart;

use crate::CartNotice;

/// Cart state as observers see it.
///
/// Snapshots are replaced wholesale; the cart inside is shared, never
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    /// Last cart reported by the service, if any.
    pub cart: Option<Arc<Cart>>,
    /// A load is in flight.
    pub is_loading: bool,
    /// The cart panel is visible.
    pub is_open: bool,
    /// Outcome of the last failed add or update, until dismissed.
    pub notice: Option<CartNotice>,
}

impl CartSnapshot {
    /// Sum of line-item quantities, 0 without a cart.
    pub fn item_count(&self) -> i64 {
        self.cart.as_ref().map_or(0, |c| c.item_count())
    }

    pub fn has_cart(&self) -> bool {
        self.cart.is_some()
    }
}
