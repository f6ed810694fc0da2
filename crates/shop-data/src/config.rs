//! Store API client configuration.

use url::Url;

use crate::FetchError;

/// Default address of a locally running commerce service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the store API.
///
/// Custom `Debug` implementation redacts the publishable key.
#[derive(Clone)]
pub struct StoreConfig {
    /// Service root; endpoint paths are joined onto it.
    pub base_url: Url,
    /// Sent as `x-publishable-api-key` on every request when set.
    pub publishable_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "publishable_key",
                &self.publishable_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StoreConfig {
    /// Configuration for the service at `base_url` with default settings.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            base_url,
            publishable_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Configuration for a service on the local machine.
    pub fn local() -> Result<Self, FetchError> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Set the publishable API key.
    pub fn with_publishable_key(mut self, key: impl Into<String>) -> Self {
        self.publishable_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// A base URL with a path prefix (`https://shop.example/api`) keeps it.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&full).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", full, e)))
    }
}
