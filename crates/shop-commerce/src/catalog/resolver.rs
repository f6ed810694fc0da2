//! Variant resolution from option selections.

use std::collections::BTreeMap;

use crate::catalog::{
    extract_options, resolve_inventory, resolve_price, OptionAxis, PriceInfo, Product,
    ProductVariant,
};
use crate::ids::RegionId;
use serde::{Deserialize, Serialize};

/// The shopper's current choice on each option axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections(BTreeMap<OptionAxis, String>);

impl Selections {
    /// No selection on any axis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a value on an axis, replacing any earlier choice.
    pub fn select(&mut self, axis: OptionAxis, value: impl Into<String>) {
        self.0.insert(axis, value.into());
    }

    /// Builder form of [`select`](Self::select).
    pub fn with(mut self, axis: OptionAxis, value: impl Into<String>) -> Self {
        self.select(axis, value);
        self
    }

    /// Drop the choice on an axis.
    pub fn clear(&mut self, axis: OptionAxis) {
        self.0.remove(&axis);
    }

    /// The selected value on an axis.
    pub fn get(&self, axis: OptionAxis) -> Option<&str> {
        self.0.get(&axis).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionAxis, &str)> {
        self.0.iter().map(|(axis, value)| (*axis, value.as_str()))
    }
}

/// Find the variant matching the selections.
///
/// A variant matches when, on every axis the product declares, its value
/// equals the selected one. Variants are scanned in order and the first match
/// wins.
pub fn find_variant<'a>(product: &'a Product, selections: &Selections) -> Option<&'a ProductVariant> {
    let options = extract_options(product);
    product.variants.iter().find(|variant| {
        options
            .axes()
            .all(|axis| options.value_of(variant, axis) == selections.get(axis))
    })
}

/// Initial selections for a product.
///
/// Taken from the first variant's own values rather than the first declared
/// value of each option, so the result always resolves to a real variant.
pub fn default_selections(product: &Product) -> Selections {
    let mut selections = Selections::new();
    let Some(first) = product.variants.first() else {
        return selections;
    };
    let options = extract_options(product);
    for axis in options.axes() {
        if let Some(value) = options.value_of(first, axis) {
            selections.select(axis, value);
        }
    }
    selections
}

/// The variant shown on product cards: the first one.
pub fn display_variant(product: &Product) -> Option<&ProductVariant> {
    product.variants.first()
}

/// Everything a product page needs to render the buy box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView<'a> {
    /// Matching variant, if the selections resolve.
    pub variant: Option<&'a ProductVariant>,
    /// Price of the matching variant.
    pub price: Option<PriceInfo>,
    /// Available stock of the matching variant, 0 when unresolved.
    pub stock: i64,
}

impl ProductView<'_> {
    /// Whether the shopper can add the current selection to the cart.
    pub fn is_purchasable(&self) -> bool {
        self.variant.is_some() && self.stock > 0
    }
}

/// Resolve variant, price and stock for the current selections.
pub fn resolve_view<'a>(
    product: &'a Product,
    selections: &Selections,
    region_id: &RegionId,
) -> ProductView<'a> {
    let variant = find_variant(product, selections);
    ProductView {
        variant,
        price: variant.map(|v| resolve_price(v, region_id)),
        stock: variant.map(resolve_inventory).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InventoryRecord, PriceEntry, ProductOption};
    use crate::money::{Currency, Money};

    fn eur(amount: f64) -> Money {
        Money::from_major(amount, Currency::EUR)
    }

    fn two_color_product() -> Product {
        let mut product = Product::new("prod_1", "sofa", "Paloma Haven");
        product.options = vec![
            ProductOption::new("Colors", ["Black", "White"]),
            ProductOption::new("Materials", ["Linen"]),
        ];
        product.variants = vec![
            ProductVariant::new("variant_black", "Black / Linen")
                .with_option("Colors", "Black")
                .with_option("Materials", "Linen")
                .with_price(PriceEntry::unconditional(eur(100.0))),
            ProductVariant::new("variant_white", "White / Linen")
                .with_option("Colors", "White")
                .with_option("Materials", "Linen")
                .with_price(PriceEntry::unconditional(eur(120.0))),
        ];
        product
    }

    #[test]
    fn test_selecting_white_resolves_second_variant() {
        let product = two_color_product();
        let mut selections = default_selections(&product);
        selections.select(OptionAxis::Color, "White");

        let view = resolve_view(&product, &selections, &RegionId::new("reg_eu"));
        let variant = view.variant.unwrap();
        assert_eq!(variant.id.as_str(), "variant_white");

        let price = view.price.unwrap();
        assert_eq!(price.original, eur(120.0));
        assert_eq!(price.calculated, eur(120.0));
        assert!(!price.is_on_sale);
    }

    #[test]
    fn test_find_variant_requires_every_axis() {
        let product = two_color_product();

        let partial = Selections::new().with(OptionAxis::Color, "Black");
        assert!(find_variant(&product, &partial).is_none());

        let unknown = Selections::new()
            .with(OptionAxis::Color, "Green")
            .with(OptionAxis::Material, "Linen");
        assert!(find_variant(&product, &unknown).is_none());
    }

    #[test]
    fn test_find_variant_first_listed_wins() {
        let mut product = two_color_product();
        let duplicate = ProductVariant::new("variant_black_dup", "Black / Linen")
            .with_option("Colors", "Black")
            .with_option("Materials", "Linen");
        product.variants.push(duplicate);

        let selections = Selections::new()
            .with(OptionAxis::Color, "Black")
            .with(OptionAxis::Material, "Linen");
        assert_eq!(
            find_variant(&product, &selections).unwrap().id.as_str(),
            "variant_black"
        );
    }

    #[test]
    fn test_default_selections_follow_first_variant() {
        let mut product = two_color_product();
        // Declared values no longer match the first variant.
        product.options[0] = ProductOption::new("Colors", ["Red", "White", "Black"]);

        let selections = default_selections(&product);
        assert_eq!(selections.get(OptionAxis::Color), Some("Black"));
        assert_eq!(selections.get(OptionAxis::Material), Some("Linen"));
        assert!(find_variant(&product, &selections).is_some());
    }

    #[test]
    fn test_default_selections_always_resolve() {
        let mut product = Product::new("prod_2", "chair", "Chair");
        product.options = vec![ProductOption::new("Color", ["Oak"])];
        // First variant is missing the declared axis entirely.
        product.variants = vec![
            ProductVariant::new("variant_a", "Default"),
            ProductVariant::new("variant_b", "Oak").with_option("Color", "Oak"),
        ];

        let selections = default_selections(&product);
        assert!(selections.is_empty());
        assert_eq!(
            find_variant(&product, &selections).unwrap().id.as_str(),
            "variant_a"
        );
    }

    #[test]
    fn test_colliding_options_match_on_kept_option() {
        let mut product = Product::new("prod_5", "rug", "Rug");
        product.options = vec![
            ProductOption::new("Color", ["Red"]),
            ProductOption::new("Colors", ["Blue"]),
        ];
        product.variants = vec![ProductVariant::new("variant_red", "Red")
            .with_option("Colors", "Blue")
            .with_option("Color", "Red")];

        let selections = default_selections(&product);
        assert_eq!(selections.get(OptionAxis::Color), Some("Red"));

        let red = Selections::new().with(OptionAxis::Color, "Red");
        assert_eq!(find_variant(&product, &red).unwrap().id.as_str(), "variant_red");
        let blue = Selections::new().with(OptionAxis::Color, "Blue");
        assert!(find_variant(&product, &blue).is_none());
    }

    #[test]
    fn test_product_without_axes_resolves_first_variant() {
        let mut product = Product::new("prod_3", "lamp", "Lamp");
        product.options = vec![ProductOption::new("Size", ["S"])];
        product.variants = vec![ProductVariant::new("variant_s", "S").with_option("Size", "S")];

        let view = resolve_view(&product, &Selections::new(), &RegionId::new("reg_eu"));
        assert_eq!(view.variant.unwrap().id.as_str(), "variant_s");
    }

    #[test]
    fn test_missing_variants_degrade() {
        let product = Product::new("prod_4", "empty", "Empty");
        assert!(default_selections(&product).is_empty());
        assert!(display_variant(&product).is_none());

        let view = resolve_view(&product, &Selections::new(), &RegionId::new("reg_eu"));
        assert!(view.variant.is_none());
        assert!(view.price.is_none());
        assert_eq!(view.stock, 0);
        assert!(!view.is_purchasable());
    }

    #[test]
    fn test_view_reports_stock() {
        let mut product = two_color_product();
        product.variants[0]
            .inventory
            .push(InventoryRecord::single_location(4));

        let view = resolve_view(
            &product,
            &default_selections(&product),
            &RegionId::new("reg_eu"),
        );
        assert_eq!(view.stock, 4);
        assert!(view.is_purchasable());
    }

    #[test]
    fn test_find_variant_iff_exact_match() {
        let product = two_color_product();
        let colors = ["Black", "White", "Green"];
        let materials = ["Linen", "Wool"];

        for color in colors {
            for material in materials {
                let selections = Selections::new()
                    .with(OptionAxis::Color, color)
                    .with(OptionAxis::Material, material);
                let expected = product.variants.iter().any(|v| {
                    v.value_of("Colors") == Some(color) && v.value_of("Materials") == Some(material)
                });
                assert_eq!(find_variant(&product, &selections).is_some(), expected);
            }
        }
    }
}
