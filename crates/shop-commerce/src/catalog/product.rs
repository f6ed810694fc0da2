//! Product, option and variant types.

use std::collections::BTreeMap;

use crate::catalog::InventoryRecord;
use crate::ids::{ProductId, RegionId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Price rule key the commerce service uses to scope a price to a region.
pub const REGION_RULE: &str = "region_id";

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// URL-friendly handle (unique).
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Short tagline shown under the title.
    pub subtitle: Option<String>,
    /// Full description.
    pub description: Option<String>,
    /// Title of the collection the product belongs to.
    pub collection: Option<String>,
    /// Declared options, in the order the merchant defined them.
    pub options: Vec<ProductOption>,
    /// Purchasable variants, in the order the service returned them.
    pub variants: Vec<ProductVariant>,
    /// Image URLs.
    pub images: Vec<String>,
    /// Thumbnail URL.
    pub thumbnail: Option<String>,
}

impl Product {
    /// Create a product with no options or variants.
    pub fn new(id: impl Into<ProductId>, handle: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handle: handle.into(),
            title: title.into(),
            subtitle: None,
            description: None,
            collection: None,
            options: Vec::new(),
            variants: Vec::new(),
            images: Vec::new(),
            thumbnail: None,
        }
    }

    /// Whether the product can be bought at all.
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Subtitle for listings, falling back to the collection title.
    pub fn display_subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref().or(self.collection.as_deref())
    }
}

/// A declared product option (e.g., Colors: Black, White).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductOption {
    /// Option title as entered by the merchant.
    pub title: String,
    /// Allowed values in display order.
    pub values: Vec<String>,
}

impl ProductOption {
    pub fn new(title: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            title: title.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A variant option value (e.g., Colors: Black).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VariantOption {
    /// Title of the product option this value belongs to.
    pub name: String,
    /// Option value.
    pub value: String,
}

impl VariantOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single price entry on a variant.
///
/// An entry with no rules applies everywhere; rules narrow it down, most
/// commonly to a region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceEntry {
    /// The listed amount.
    pub amount: Money,
    /// Price rules keyed by attribute (e.g., `region_id`).
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
}

impl PriceEntry {
    /// A price that applies in every region.
    pub fn unconditional(amount: Money) -> Self {
        Self {
            amount,
            rules: BTreeMap::new(),
        }
    }

    /// A price scoped to one region.
    pub fn for_region(amount: Money, region_id: &RegionId) -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(REGION_RULE.to_string(), region_id.to_string());
        Self { amount, rules }
    }

    /// Region this entry is scoped to, if any.
    pub fn region_id(&self) -> Option<&str> {
        self.rules.get(REGION_RULE).map(String::as_str)
    }

    /// True when the entry carries no rules at all.
    pub fn is_unconditional(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A product variant: one value per product option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// Variant title (e.g., "Linen / Black").
    pub title: String,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Option values that define this variant.
    pub options: Vec<VariantOption>,
    /// Listed prices.
    pub prices: Vec<PriceEntry>,
    /// Promotional amount computed by the service for the requested region.
    pub calculated_amount: Option<Money>,
    /// Inventory records, each with per-location levels.
    pub inventory: Vec<InventoryRecord>,
}

impl ProductVariant {
    /// Create a new variant with no options or prices.
    pub fn new(id: impl Into<VariantId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sku: None,
            options: Vec::new(),
            prices: Vec::new(),
            calculated_amount: None,
            inventory: Vec::new(),
        }
    }

    /// Add an option value to this variant.
    pub fn add_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.options.push(VariantOption::new(name, value));
    }

    /// Builder form of [`add_option`](Self::add_option).
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_option(name, value);
        self
    }

    /// Builder form for appending a price entry.
    pub fn with_price(mut self, entry: PriceEntry) -> Self {
        self.prices.push(entry);
        self
    }

    /// The variant's value for the product option titled `option_title`.
    pub fn value_of(&self, option_title: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == option_title)
            .map(|o| o.value.as_str())
    }

    /// Build a display name from option values.
    pub fn build_name(&self) -> String {
        if self.options.is_empty() {
            "Default".to_string()
        } else {
            self.options
                .iter()
                .map(|o| o.value.as_str())
                .collect::<Vec<_>>()
                .join(" / ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_price_entry_rules() {
        let eu = RegionId::new("reg_eu");
        let scoped = PriceEntry::for_region(Money::new(10000, Currency::EUR), &eu);
        assert_eq!(scoped.region_id(), Some("reg_eu"));
        assert!(!scoped.is_unconditional());

        let open = PriceEntry::unconditional(Money::new(9000, Currency::EUR));
        assert_eq!(open.region_id(), None);
        assert!(open.is_unconditional());
    }

    #[test]
    fn test_variant_value_of_matches_option_title() {
        let variant = ProductVariant::new("variant_1", "Linen / Black")
            .with_option("Materials", "Linen")
            .with_option("Colors", "Black");

        assert_eq!(variant.value_of("Colors"), Some("Black"));
        assert_eq!(variant.value_of("Materials"), Some("Linen"));
        assert_eq!(variant.value_of("Color"), None);
    }

    #[test]
    fn test_variant_build_name() {
        let variant = ProductVariant::new("variant_1", "")
            .with_option("Materials", "Linen")
            .with_option("Colors", "Black");
        assert_eq!(variant.build_name(), "Linen / Black");
        assert_eq!(ProductVariant::new("variant_2", "").build_name(), "Default");
    }

    #[test]
    fn test_product_display_subtitle_falls_back_to_collection() {
        let mut product = Product::new("prod_1", "sofa", "Paloma Haven");
        product.collection = Some("Living Room".to_string());
        assert_eq!(product.display_subtitle(), Some("Living Room"));

        product.subtitle = Some("Modern Luxe".to_string());
        assert_eq!(product.display_subtitle(), Some("Modern Luxe"));
    }
}
