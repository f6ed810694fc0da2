//! Display price derivation for a variant.

use crate::catalog::ProductVariant;
use crate::ids::RegionId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Derived price information for one variant in one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    /// Listed price before promotions.
    pub original: Money,
    /// Price after promotions; equals `original` when none apply.
    pub calculated: Money,
    /// True iff `calculated < original` and `original > 0`.
    pub is_on_sale: bool,
    /// Rounded discount percentage, 0 when not on sale.
    pub discount_percent: u32,
}

impl PriceInfo {
    /// Amount saved, zero when not on sale.
    pub fn savings(&self) -> Money {
        let zero = Money::zero(self.original.currency);
        if !self.is_on_sale {
            return zero;
        }
        self.original.checked_sub(&self.calculated).unwrap_or(zero)
    }
}

/// Resolve the display price of a variant for a region.
///
/// The original price is the entry scoped to `region_id`, else the first
/// entry with no rules, else zero. The calculated price is the service's
/// promotional amount when present, else the original.
pub fn resolve_price(variant: &ProductVariant, region_id: &RegionId) -> PriceInfo {
    let entry = variant
        .prices
        .iter()
        .find(|p| p.region_id() == Some(region_id.as_str()))
        .or_else(|| variant.prices.iter().find(|p| p.is_unconditional()));

    let original = match entry {
        Some(entry) => entry.amount,
        None => Money::zero(
            variant
                .calculated_amount
                .map(|m| m.currency)
                .unwrap_or_default(),
        ),
    };
    let calculated = variant.calculated_amount.unwrap_or(original);

    let is_on_sale = calculated.minor < original.minor && original.is_positive();
    let discount_percent = if is_on_sale {
        discount_percent(original.minor, calculated.minor)
    } else {
        0
    };

    PriceInfo {
        original,
        calculated,
        is_on_sale,
        discount_percent,
    }
}

/// round(100 * (original - calculated) / original), half rounding up.
fn discount_percent(original: i64, calculated: i64) -> u32 {
    let original = i128::from(original);
    let savings = original - i128::from(calculated);
    let rounded = (savings * 200 + original) / (original * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
