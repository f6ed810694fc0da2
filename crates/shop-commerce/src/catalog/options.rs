//! Option axes recognized by the storefront.

use crate::catalog::{Product, ProductVariant};
use serde::{Deserialize, Serialize};

/// An option axis the storefront knows how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionAxis {
    Color,
    Material,
}

impl OptionAxis {
    /// All recognized axes.
    pub const ALL: [OptionAxis; 2] = [OptionAxis::Color, OptionAxis::Material];

    /// Map a merchant-entered option title onto an axis.
    ///
    /// This is the only place the synonym policy lives. Titles that match no
    /// synonym set are not presented.
    pub fn from_option_title(title: &str) -> Option<Self> {
        match title.trim().to_lowercase().as_str() {
            "color" | "colors" => Some(OptionAxis::Color),
            "material" | "materials" => Some(OptionAxis::Material),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            OptionAxis::Color => "Colors",
            OptionAxis::Material => "Materials",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionAxis::Color => "color",
            OptionAxis::Material => "material",
        }
    }
}

impl std::fmt::Display for OptionAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One recognized axis and the declared option backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct AxisOption {
    axis: OptionAxis,
    title: String,
    values: Vec<String>,
}

/// Recognized axes of a product with their allowed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductOptions {
    axes: Vec<AxisOption>,
}

impl ProductOptions {
    fn find(&self, axis: OptionAxis) -> Option<&AxisOption> {
        self.axes.iter().find(|o| o.axis == axis)
    }

    /// Allowed values on an axis; empty when the product lacks it.
    pub fn values(&self, axis: OptionAxis) -> &[String] {
        self.find(axis).map(|o| o.values.as_slice()).unwrap_or(&[])
    }

    /// Title of the declared option presented on an axis.
    pub fn title(&self, axis: OptionAxis) -> Option<&str> {
        self.find(axis).map(|o| o.title.as_str())
    }

    /// A variant's value on an axis, read from the option presented there.
    pub fn value_of<'v>(&self, variant: &'v ProductVariant, axis: OptionAxis) -> Option<&'v str> {
        variant.value_of(self.title(axis)?)
    }

    /// Recognized axes in the product's declared order.
    pub fn axes(&self) -> impl Iterator<Item = OptionAxis> + '_ {
        self.axes.iter().map(|o| o.axis)
    }

    /// Whether the product declares the axis.
    pub fn has(&self, axis: OptionAxis) -> bool {
        self.find(axis).is_some()
    }

    /// True when no option was recognized.
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}

/// Extract the recognized option axes of a product.
///
/// When two declared options map onto the same axis, the first one wins,
/// both for the listed values and for reading variant values.
pub fn extract_options(product: &Product) -> ProductOptions {
    let mut options = ProductOptions::default();
    for option in &product.options {
        let Some(axis) = OptionAxis::from_option_title(&option.title) else {
            continue;
        };
        if options.has(axis) {
            continue;
        }
        options.axes.push(AxisOption {
            axis,
            title: option.title.clone(),
            values: option.values.clone(),
        });
    }
    options
}
