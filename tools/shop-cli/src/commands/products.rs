//! Product listing command.

use anyhow::{Context as _, Result};
use serde::Serialize;
use shop_commerce::catalog::{display_variant, resolve_inventory, resolve_price, PriceInfo};
use shop_data::{ProductQuery, StoreApi};

use super::ProductsArgs;
use crate::context::Context;
use crate::output::{format_price, stock_badge};

#[derive(Serialize)]
struct ProductCard {
    handle: String,
    title: String,
    subtitle: Option<String>,
    price: Option<PriceInfo>,
    stock: i64,
}

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let region_id = ctx.region(args.region.as_deref()).await?;
    let query = ProductQuery::new().region(&region_id).limit(args.limit);
    let products = ctx
        .client
        .list_products(&query)
        .await
        .context("Failed to list products")?;

    let cards: Vec<ProductCard> = products
        .iter()
        .map(|product| {
            let variant = display_variant(product);
            ProductCard {
                handle: product.handle.clone(),
                title: product.title.clone(),
                subtitle: product.display_subtitle().map(str::to_string),
                price: variant.map(|v| resolve_price(v, &region_id)),
                stock: variant.map(resolve_inventory).unwrap_or(0),
            }
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&cards);
        return Ok(());
    }

    if cards.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", region_id));
    let widths: [usize; 3] = [24, 28, 12];
    ctx.output.table_row(&["HANDLE", "TITLE", "PRICE"], &widths);
    for card in &cards {
        let price = card.price.as_ref().map(format_price).unwrap_or_else(|| "-".to_string());
        ctx.output
            .table_row(&[card.handle.as_str(), card.title.as_str(), price.as_str()], &widths);
        if let Some(subtitle) = &card.subtitle {
            ctx.output.kv("  collection", subtitle);
        }
        if card.price.is_some() {
            ctx.output.kv("  stock", &stock_badge(card.stock));
        }
    }

    Ok(())
}
