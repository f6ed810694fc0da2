//! Cart commands.

use anyhow::{Context as _, Result};
use shop_cart::{CartError, CartManager, CartSnapshot};
use shop_commerce::{LineItemId, VariantId};
use shop_data::StoreClient;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::format_money;

/// Smallest quantity a shopper can ask for.
const MIN_QUANTITY: i64 = 1;

/// Raise quantities below one to one before they reach the manager.
pub fn clamp_quantity(quantity: i64) -> i64 {
    quantity.max(MIN_QUANTITY)
}

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.cart_manager(args.region.as_deref()).await?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {
            let snapshot = cart.load().await?;
            print_cart(ctx, &snapshot);
        }
        CartCommand::Add { variant, quantity } => {
            cart.load().await?;
            let snapshot = cart
                .add_item(&VariantId::new(variant), clamp_quantity(quantity))
                .await
                .or_else(|e| report(ctx, &cart, e))
                .context("Failed to add item")?;
            ctx.output.success("Added to cart");
            print_cart(ctx, &snapshot);
        }
        CartCommand::Update { line, quantity } => {
            cart.load().await?;
            let snapshot = cart
                .update_item(&LineItemId::new(line), clamp_quantity(quantity))
                .await
                .or_else(|e| report(ctx, &cart, e))
                .context("Failed to update item")?;
            ctx.output.success("Cart updated");
            print_cart(ctx, &snapshot);
        }
        CartCommand::Remove { line } => {
            cart.load().await?;
            let snapshot = cart
                .remove_item(&LineItemId::new(line))
                .await
                .context("Failed to remove item")?;
            ctx.output.success("Removed from cart");
            print_cart(ctx, &snapshot);
        }
        CartCommand::Open => {
            cart.load().await?;
            let snapshot = cart.open_cart();
            print_cart(ctx, &snapshot);
        }
        CartCommand::Forget => {
            let snapshot = cart.forget().await?;
            ctx.output.success("Forgot the stored cart");
            if ctx.output.is_json() {
                print_cart(ctx, &snapshot);
            }
        }
    }

    Ok(())
}

/// Show the notice the manager published for a failed mutation.
fn report(
    ctx: &Context,
    cart: &CartManager<StoreClient>,
    err: CartError,
) -> Result<CartSnapshot, CartError> {
    if let Some(notice) = cart.snapshot().notice {
        ctx.output.warn(notice.message());
    }
    Err(err)
}

fn print_cart(ctx: &Context, snapshot: &CartSnapshot) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "cart": snapshot.cart.as_deref(),
            "item_count": snapshot.item_count(),
            "is_open": snapshot.is_open,
            "notice": snapshot.notice,
        }));
        return;
    }

    let Some(cart) = snapshot.cart.as_deref() else {
        ctx.output.info("Your cart is empty.");
        return;
    };

    ctx.output.header(&format!("Cart {} ({} items)", cart.id, snapshot.item_count()));
    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    let widths: [usize; 5] = [16, 32, 5, 12, 12];
    ctx.output
        .table_row(&["LINE", "ITEM", "QTY", "UNIT", "TOTAL"], &widths);
    for item in &cart.items {
        let title = item.display_title();
        let quantity = item.quantity.to_string();
        let unit = item.unit_price.display();
        let total = format_money(item.total().ok());
        ctx.output.table_row(
            &[
                item.id.as_str(),
                title.as_str(),
                quantity.as_str(),
                unit.as_str(),
                total.as_str(),
            ],
            &widths,
        );
    }
    ctx.output.kv("Subtotal", &format_money(cart.subtotal().ok()));
    if let Some(region_id) = &cart.region_id {
        ctx.output.kv("Region", &format!("{} ({})", region_id, cart.currency.code()));
    }
}
