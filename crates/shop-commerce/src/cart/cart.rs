//! Cart and line item types.
//!
//! A `Cart` here is a snapshot of the remote cart as last reported by the
//! commerce service. It is never mutated locally; every change goes through
//! the service and the snapshot is replaced with its response.

use crate::error::CommerceError;
use crate::ids::{CartId, LineItemId, ProductId, RegionId, VariantId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A shopping cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Cart identifier minted by the service.
    pub id: CartId,
    /// Region the cart prices against.
    pub region_id: Option<RegionId>,
    /// Cart currency.
    pub currency: Currency,
    /// Line items in the order the service returned them.
    pub items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    pub fn new(id: impl Into<CartId>, currency: Currency) -> Self {
        Self {
            id: id.into(),
            region_id: None,
            currency,
            items: Vec::new(),
        }
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by ID.
    pub fn line_item(&self, line_item_id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == line_item_id)
    }

    /// Get an item by variant ID.
    pub fn line_item_by_variant(&self, variant_id: &VariantId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.variant_id == variant_id)
    }

    /// Sum of unit price times quantity over all items.
    ///
    /// Returns an error on overflow or when an item is priced in another currency.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        let mut total = Money::zero(self.currency);
        for item in &self.items {
            if item.unit_price.currency != self.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.currency.code().to_string(),
                    got: item.unit_price.currency.code().to_string(),
                });
            }
            let line = item.total()?;
            total = total.checked_add(&line).ok_or(CommerceError::Overflow)?;
        }
        Ok(total)
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Line item identifier.
    pub id: LineItemId,
    /// Variant being purchased.
    pub variant_id: VariantId,
    /// Product ID, when the service expands it.
    pub product_id: Option<ProductId>,
    /// Product title (denormalized for display).
    pub title: String,
    /// Variant title (e.g., "Linen / Black").
    pub variant_title: Option<String>,
    /// Thumbnail URL.
    pub thumbnail: Option<String>,
    /// Quantity, at least 1.
    pub quantity: i64,
    /// Unit price.
    pub unit_price: Money,
}

impl LineItem {
    /// Create a line item.
    pub fn new(
        id: impl Into<LineItemId>,
        variant_id: impl Into<VariantId>,
        title: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> Result<Self, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        Ok(Self {
            id: id.into(),
            variant_id: variant_id.into(),
            product_id: None,
            title: title.into(),
            variant_title: None,
            thumbnail: None,
            quantity,
            unit_price,
        })
    }

    /// Unit price times quantity.
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Display title combining product and variant titles.
    pub fn display_title(&self) -> String {
        match &self.variant_title {
            Some(variant) if !variant.is_empty() => format!("{} ({})", self.title, variant),
            _ => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, variant: &str, quantity: i64, cents: i64) -> LineItem {
        LineItem::new(id, variant, "Paloma Haven", quantity, Money::new(cents, Currency::EUR))
            .unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::new("cart_1", Currency::EUR);
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert!(cart.subtotal().unwrap().is_zero());
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::new("cart_1", Currency::EUR);
        cart.items.push(item("cali_1", "variant_1", 2, 1000));
        cart.items.push(item("cali_2", "variant_2", 3, 500));

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.unique_item_count(), 2);
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new("cart_1", Currency::EUR);
        cart.items.push(item("cali_1", "variant_1", 2, 1000));
        cart.items.push(item("cali_2", "variant_2", 1, 2000));

        assert_eq!(cart.subtotal().unwrap().minor, 4000);
    }

    #[test]
    fn test_subtotal_currency_mismatch() {
        let mut cart = Cart::new("cart_1", Currency::EUR);
        let mut foreign = item("cali_1", "variant_1", 1, 1000);
        foreign.unit_price.currency = Currency::USD;
        cart.items.push(foreign);

        assert!(matches!(
            cart.subtotal(),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_lookup() {
        let mut cart = Cart::new("cart_1", Currency::EUR);
        cart.items.push(item("cali_1", "variant_1", 1, 1000));

        assert!(cart.line_item(&LineItemId::new("cali_1")).is_some());
        assert!(cart.line_item(&LineItemId::new("cali_9")).is_none());
        assert!(cart.line_item_by_variant(&VariantId::new("variant_1")).is_some());
    }

    #[test]
    fn test_invalid_quantity() {
        let result = LineItem::new("cali_1", "variant_1", "Sofa", 0, Money::new(1, Currency::EUR));
        assert_eq!(result.unwrap_err(), CommerceError::InvalidQuantity(0));
    }

    #[test]
    fn test_display_title() {
        let mut line = item("cali_1", "variant_1", 1, 1000);
        assert_eq!(line.display_title(), "Paloma Haven");

        line.variant_title = Some("Linen / Black".to_string());
        assert_eq!(line.display_title(), "Paloma Haven (Linen / Black)");
    }
}
