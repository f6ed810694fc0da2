//! A single typed value kept under a fixed key.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::{Cache, CacheError};

/// One named entry in a [`Cache`].
///
/// The storefront keeps exactly one cart identifier per client; a `Slot`
/// gives that value a home without callers repeating the key.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    cache: Cache,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Slot<T> {
    /// Bind a slot to `key` in `cache`.
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    /// The key this slot occupies.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored value.
    pub fn load(&self) -> Result<Option<T>, CacheError> {
        self.cache.get(&self.key)
    }

    /// Replace the stored value.
    pub fn store(&self, value: &T) -> Result<(), CacheError> {
        self.cache.set(&self.key, value)
    }

    /// Remove the stored value.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.cache.delete(&self.key)
    }
}
