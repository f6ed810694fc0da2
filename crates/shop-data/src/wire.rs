//! Wire shapes of the store API and their validation into the domain model.
//!
//! The service's payloads are loosely typed: almost every field may be
//! missing or null depending on which relations the request expanded. The
//! structs here accept that looseness and the `*_from_wire` functions decide,
//! field by field, whether a gap is fatal (cart currency, line item variant)
//! or degrades to an empty value (prices, options, inventory).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use shop_commerce::catalog::{
    InventoryRecord, LocationLevel, PriceEntry, Product, ProductOption, ProductVariant,
    VariantOption,
};
use shop_commerce::{Cart, CommerceError, Currency, LineItem, Money, RegionId};

use crate::types::{Deletion, Region};
use crate::FetchError;

// -- Envelopes ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CartEnvelope {
    pub cart: WireCart,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: WireProduct,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope {
    #[serde(default)]
    pub products: Vec<WireProduct>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegionsEnvelope {
    #[serde(default)]
    pub regions: Vec<WireRegion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDeletion {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

impl From<WireDeletion> for Deletion {
    fn from(wire: WireDeletion) -> Self {
        Deletion {
            id: wire.id,
            object: wire.object.unwrap_or_default(),
            deleted: wire.deleted,
        }
    }
}

// -- Cart ---------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct WireCart {
    pub id: String,
    pub region_id: Option<String>,
    pub currency_code: Option<String>,
    pub region: Option<WireRegionRef>,
    pub items: Option<Vec<WireLineItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRegionRef {
    pub currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLineItem {
    pub id: String,
    pub variant_id: Option<String>,
    pub product_id: Option<String>,
    pub title: Option<String>,
    pub product_title: Option<String>,
    pub variant_title: Option<String>,
    pub thumbnail: Option<String>,
    pub quantity: i64,
    pub unit_price: Option<f64>,
}

/// Validate a cart payload.
///
/// Fails when the cart currency is missing or not an ISO 4217 code, or when
/// a line item has no variant or a non-positive quantity.
pub(crate) fn cart_from_wire(endpoint: &str, wire: WireCart) -> Result<Cart, FetchError> {
    let code = wire
        .currency_code
        .or_else(|| wire.region.and_then(|r| r.currency_code))
        .ok_or_else(|| {
            FetchError::invalid(
                endpoint,
                CommerceError::ValidationError(format!("cart {} has no currency", wire.id)),
            )
        })?;
    let currency = Currency::parse(&code).map_err(|e| FetchError::invalid(endpoint, e))?;

    let mut cart = Cart::new(wire.id, currency);
    cart.region_id = wire.region_id.map(RegionId::from);

    for item in wire.items.unwrap_or_default() {
        let variant_id = item.variant_id.ok_or_else(|| {
            FetchError::invalid(
                endpoint,
                CommerceError::ValidationError(format!("line item {} has no variant", item.id)),
            )
        })?;
        let title = item.title.or(item.product_title).unwrap_or_default();
        let unit_price = Money::from_major(item.unit_price.unwrap_or(0.0), currency);

        let mut line = LineItem::new(item.id, variant_id, title, item.quantity, unit_price)
            .map_err(|e| FetchError::invalid(endpoint, e))?;
        line.product_id = item.product_id.map(Into::into);
        line.variant_title = item.variant_title;
        line.thumbnail = item.thumbnail;
        cart.items.push(line);
    }

    Ok(cart)
}

// -- Product ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct WireProduct {
    pub id: String,
    pub handle: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub collection: Option<WireCollection>,
    pub options: Option<Vec<WireOption>>,
    pub variants: Option<Vec<WireVariant>>,
    pub images: Option<Vec<WireImage>>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCollection {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireImage {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireOption {
    pub id: Option<String>,
    pub title: Option<String>,
    pub values: Option<Vec<WireOptionValue>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireOptionValue {
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVariant {
    pub id: String,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub options: Option<Vec<WireVariantOption>>,
    pub prices: Option<Vec<WirePrice>>,
    pub calculated_price: Option<WireCalculatedPrice>,
    pub inventory_items: Option<Vec<WireInventoryItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVariantOption {
    pub value: Option<String>,
    pub option_id: Option<String>,
    pub option: Option<WireOptionRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireOptionRef {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePrice {
    pub amount: Option<f64>,
    pub currency_code: Option<String>,
    pub rules: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCalculatedPrice {
    pub calculated_amount: Option<f64>,
    pub currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireInventoryItem {
    pub inventory_item_id: Option<String>,
    pub inventory: Option<WireInventory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireInventory {
    pub location_levels: Option<Vec<WireLocationLevel>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLocationLevel {
    pub location_id: Option<String>,
    pub available_quantity: Option<i64>,
}

/// Convert a product payload. Never fails; unusable pieces are dropped.
pub(crate) fn product_from_wire(wire: WireProduct) -> Product {
    let options: Vec<(Option<String>, ProductOption)> = wire
        .options
        .unwrap_or_default()
        .into_iter()
        .filter_map(|o| {
            let title = o.title?;
            let values = o
                .values
                .unwrap_or_default()
                .into_iter()
                .filter_map(|v| v.value);
            Some((o.id, ProductOption::new(title, values)))
        })
        .collect();

    let variants = wire
        .variants
        .unwrap_or_default()
        .into_iter()
        .map(|v| variant_from_wire(v, &options))
        .collect();

    let mut product = Product::new(
        wire.id,
        wire.handle.unwrap_or_default(),
        wire.title.unwrap_or_default(),
    );
    product.subtitle = wire.subtitle;
    product.description = wire.description;
    product.collection = wire.collection.and_then(|c| c.title);
    product.options = options.into_iter().map(|(_, o)| o).collect();
    product.variants = variants;
    product.images = wire
        .images
        .unwrap_or_default()
        .into_iter()
        .filter_map(|i| i.url)
        .collect();
    product.thumbnail = wire.thumbnail;
    product
}

fn variant_from_wire(wire: WireVariant, options: &[(Option<String>, ProductOption)]) -> ProductVariant {
    let mut variant = ProductVariant::new(wire.id, wire.title.unwrap_or_default());
    variant.sku = wire.sku;

    for option in wire.options.unwrap_or_default() {
        let Some(value) = option.value else { continue };
        // Unexpanded option relations only carry the id; recover the title
        // from the product's declared options.
        let name = option.option.and_then(|o| o.title).or_else(|| {
            let id = option.option_id.as_deref()?;
            options
                .iter()
                .find(|(oid, _)| oid.as_deref() == Some(id))
                .map(|(_, o)| o.title.clone())
        });
        match name {
            Some(name) => variant.options.push(VariantOption::new(name, value)),
            None => tracing::debug!(variant_id = %variant.id, "skipping option value without title"),
        }
    }

    for price in wire.prices.unwrap_or_default() {
        match price_from_wire(price) {
            Some(entry) => variant.prices.push(entry),
            None => tracing::warn!(variant_id = %variant.id, "skipping price with missing amount or malformed currency"),
        }
    }

    variant.calculated_amount = wire.calculated_price.and_then(|c| {
        let amount = c.calculated_amount?;
        let currency = c
            .currency_code
            .as_deref()
            .and_then(Currency::from_code)
            .or_else(|| variant.prices.first().map(|p| p.amount.currency))?;
        Some(Money::from_major(amount, currency))
    });

    variant.inventory = wire
        .inventory_items
        .unwrap_or_default()
        .into_iter()
        .map(|item| InventoryRecord {
            inventory_item_id: item.inventory_item_id,
            location_levels: item
                .inventory
                .and_then(|i| i.location_levels)
                .unwrap_or_default()
                .into_iter()
                .map(|level| LocationLevel {
                    location_id: level.location_id,
                    available_quantity: level.available_quantity.unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    variant
}

fn price_from_wire(wire: WirePrice) -> Option<PriceEntry> {
    let amount = wire.amount?;
    let currency = Currency::from_code(wire.currency_code.as_deref()?)?;
    let rules = wire
        .rules
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect();
    Some(PriceEntry {
        amount: Money::from_major(amount, currency),
        rules,
    })
}

// -- Region -------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct WireRegion {
    pub id: String,
    pub name: Option<String>,
    pub currency_code: Option<String>,
    pub countries: Option<Vec<WireCountry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCountry {
    pub iso_2: Option<String>,
}

/// Convert a region payload; `None` when it has no usable currency code.
pub(crate) fn region_from_wire(wire: WireRegion) -> Option<Region> {
    let Some(currency) = wire.currency_code.as_deref().and_then(Currency::from_code) else {
        tracing::warn!(region_id = %wire.id, currency = ?wire.currency_code, "skipping region with malformed currency");
        return None;
    };
    Some(Region {
        id: RegionId::new(wire.id),
        name: wire.name.unwrap_or_default(),
        currency,
        countries: wire
            .countries
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.iso_2)
            .collect(),
    })
}
