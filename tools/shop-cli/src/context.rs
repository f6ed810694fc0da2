//! CLI execution context.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use shop_cache::Cache;
use shop_cart::{CartManager, StorefrontConfig};
use shop_commerce::RegionId;
use shop_data::{StoreApi, StoreClient};

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// Output handler.
    pub output: Output,
    /// Store API client.
    pub client: StoreClient,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let mut config = if let Some(path) = config_path {
            StorefrontConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            StorefrontConfig::discover(&cwd)?
        };
        config.apply_env();

        let client = StoreClient::new(config.store_config()?)
            .context("Failed to create store client")?;
        tracing::debug!(
            base_url = %config.store.base_url,
            state_file = %config.state_file().display(),
            "loaded storefront config"
        );
        output.debug(&format!("Using store at {}", config.store.base_url));

        Ok(Self {
            config,
            output,
            client,
        })
    }

    /// Region to price and create carts in.
    ///
    /// An explicit override wins, then the configured region, then the first
    /// region the service lists.
    pub async fn region(&self, explicit: Option<&str>) -> Result<RegionId> {
        if let Some(id) = explicit {
            return Ok(RegionId::new(id));
        }
        if let Some(id) = self.config.region_id() {
            return Ok(id);
        }

        let regions = self
            .client
            .list_regions()
            .await
            .context("Failed to list regions")?;
        match regions.into_iter().next() {
            Some(region) => {
                self.output
                    .debug(&format!("No region configured, using {} ({})", region.name, region.id));
                Ok(region.id)
            }
            None => bail!("No region configured and the store lists none; set SHOP_REGION_ID"),
        }
    }

    /// Local state file.
    pub fn state_file(&self) -> PathBuf {
        self.config.state_file()
    }

    /// Cart manager over the persisted state file.
    pub async fn cart_manager(&self, region: Option<&str>) -> Result<CartManager<StoreClient>> {
        let path = self.state_file();
        let cache = Cache::open_file(&path)
            .with_context(|| format!("Failed to open state file: {}", path.display()))?;
        let region_id = self.region(region).await?;

        Ok(CartManager::with_storage_key(
            self.client.clone(),
            cache,
            region_id,
            self.config.cart.storage_key.clone(),
        ))
    }
}
