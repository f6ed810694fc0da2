//! Cart error types.

use shop_cache::CacheError;
use shop_data::FetchError;
use thiserror::Error;

/// Errors returned by cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// The commerce service rejected or failed the request.
    #[error(transparent)]
    Api(#[from] FetchError),

    /// The operation needs an existing cart and none is stored.
    #[error("No cart found")]
    NoCart,

    /// The persisted cart id could not be read or written.
    #[error("Cart storage error: {0}")]
    Cache(#[from] CacheError),
}

impl CartError {
    /// Message used to classify the failure for the shopper.
    pub fn message(&self) -> String {
        match self {
            CartError::Api(e) => e.message(),
            other => other.to_string(),
        }
    }
}
