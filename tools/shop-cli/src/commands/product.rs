//! Product detail command.

use anyhow::{Context as _, Result};
use serde::Serialize;
use shop_commerce::catalog::{
    default_selections, extract_options, resolve_view, OptionAxis, Product, ProductOptions,
    ProductView, Selections,
};
use shop_data::StoreApi;

use super::ProductArgs;
use crate::context::Context;
use crate::output::{format_price, stock_badge};

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let region_id = ctx.region(args.region.as_deref()).await?;
    let product = ctx
        .client
        .get_product_by_handle(&args.handle, &region_id)
        .await
        .with_context(|| format!("Failed to fetch product '{}'", args.handle))?
        .with_context(|| format!("No product with handle '{}'", args.handle))?;

    let options = extract_options(&product);
    let selections = apply_overrides(
        default_selections(&product),
        &[
            (OptionAxis::Color, args.color),
            (OptionAxis::Material, args.material),
        ],
    );
    let view = resolve_view(&product, &selections, &region_id);

    if ctx.output.is_json() {
        ctx.output.json(&ProductReport {
            product: &product,
            options: &options,
            selections: &selections,
            view: &view,
        });
        return Ok(());
    }

    print_product(ctx, &product, &options, &selections, &view);
    Ok(())
}

#[derive(Serialize)]
struct ProductReport<'a> {
    product: &'a Product,
    options: &'a ProductOptions,
    selections: &'a Selections,
    view: &'a ProductView<'a>,
}

/// Replace default selections with the ones given on the command line.
fn apply_overrides(mut selections: Selections, overrides: &[(OptionAxis, Option<String>)]) -> Selections {
    for (axis, value) in overrides {
        if let Some(value) = value {
            selections.select(*axis, value.clone());
        }
    }
    selections
}

fn print_product(
    ctx: &Context,
    product: &Product,
    options: &ProductOptions,
    selections: &Selections,
    view: &ProductView<'_>,
) {
    ctx.output.header(&product.title);
    if let Some(subtitle) = product.display_subtitle() {
        ctx.output.kv("Collection", subtitle);
    }
    if let Some(description) = &product.description {
        ctx.output.kv("Description", description);
    }

    for axis in options.axes() {
        let values: Vec<String> = options
            .values(axis)
            .iter()
            .map(|v| {
                if selections.get(axis) == Some(v.as_str()) {
                    format!("[{}]", v)
                } else {
                    v.clone()
                }
            })
            .collect();
        ctx.output.kv(axis.label(), &values.join("  "));
    }

    match (view.variant, view.price) {
        (Some(variant), Some(price)) => {
            ctx.output.kv("Variant", &format!("{} ({})", variant.build_name(), variant.id));
            ctx.output.kv("Price", &format_price(&price));
            ctx.output.kv("Stock", &stock_badge(view.stock));
            if !view.is_purchasable() {
                ctx.output.warn("This selection cannot be added to the cart right now.");
            }
        }
        _ => ctx
            .output
            .warn("No variant matches this selection. Choose another combination."),
    }
}
