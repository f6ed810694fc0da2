//! Storefront configuration.
//!
//! Read from `shop.toml`, `.shop.toml` or `shop.json`, with `SHOP_*`
//! environment variables taking precedence over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shop_commerce::RegionId;
use shop_data::{FetchError, StoreConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use thiserror::Error;

use crate::manager::DEFAULT_CART_KEY;

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// Errors loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or JSON for this schema.
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The values do not make a usable client configuration.
    #[error("Invalid store configuration: {0}")]
    Store(#[from] FetchError),

    /// The file could not be written.
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the config back out failed.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Storefront configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Commerce service connection.
    #[serde(default)]
    pub store: StoreSection,

    /// Cart persistence.
    #[serde(default)]
    pub cart: CartSection,

    /// Local storage.
    #[serde(default)]
    pub storage: StorageSection,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Service root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Publishable API key sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publishable_key: Option<String>,

    /// Region carts are created in and prices resolved for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            publishable_key: None,
            region_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[cart]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSection {
    /// Key the cart id is persisted under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

impl Default for CartSection {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Directory for the local state file. Defaults to
    /// `$HOME/.local/share/shop`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Find the nearest config file in `start` or its ancestors.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Load the nearest config file, or defaults when there is none.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        match Self::find(start) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using config file");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Serialize to TOML, or JSON when `path` ends in `.json`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        };
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `SHOP_BASE_URL`, `SHOP_PUBLISHABLE_KEY` and `SHOP_REGION_ID`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = set("SHOP_BASE_URL") {
            self.store.base_url = url;
        }
        if let Some(key) = set("SHOP_PUBLISHABLE_KEY") {
            self.store.publishable_key = Some(key);
        }
        if let Some(region) = set("SHOP_REGION_ID") {
            self.store.region_id = Some(region);
        }
    }

    /// Client configuration for the `[store]` section.
    pub fn store_config(&self) -> Result<StoreConfig, ConfigError> {
        let mut config = StoreConfig::new(&self.store.base_url)?.with_timeout_secs(self.store.timeout_secs);
        if let Some(key) = &self.store.publishable_key {
            config = config.with_publishable_key(key.clone());
        }
        Ok(config)
    }

    /// Configured region, if any.
    pub fn region_id(&self) -> Option<RegionId> {
        self.store.region_id.as_deref().map(RegionId::new)
    }

    /// Directory holding local state.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| default_data_dir().join("shop"))
    }

    /// Path of the local state file.
    pub fn state_file(&self) -> PathBuf {
        self.data_dir().join("state.json")
    }
}

/// Get the platform-specific data directory.
fn default_data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}
