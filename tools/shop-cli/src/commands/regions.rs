//! Region listing command.

use anyhow::{Context as _, Result};
use shop_data::StoreApi;

use crate::context::Context;

/// Run the regions command.
pub async fn run(ctx: &Context) -> Result<()> {
    let regions = ctx
        .client
        .list_regions()
        .await
        .context("Failed to list regions")?;

    if ctx.output.is_json() {
        ctx.output.json(&regions);
        return Ok(());
    }

    if regions.is_empty() {
        ctx.output.info("No regions found.");
        return Ok(());
    }

    ctx.output.header("Regions");
    let configured = ctx.config.region_id();
    for region in &regions {
        let marker = if configured.as_ref() == Some(&region.id) { " (configured)" } else { "" };
        ctx.output.list_item(&format!(
            "{} {} [{}] {}{}",
            region.id,
            region.name,
            region.currency.code(),
            region.countries.join(", "),
            marker
        ));
    }

    Ok(())
}
