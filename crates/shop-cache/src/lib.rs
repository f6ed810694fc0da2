//! Type-safe client-local storage for the storefront.
//!
//! Provides a small key-value abstraction with in-memory and JSON-file
//! backends, and a typed [`Cache`] on top that serializes values as JSON.
//!
//! # Example
//!
//! ```rust
//! use shop_cache::{Cache, Slot};
//!
//! let cache = Cache::in_memory();
//! let cart_id: Slot<String> = Slot::new(cache, "medusa_cart_id");
//!
//! cart_id.store(&"cart_01".to_string()).unwrap();
//! assert_eq!(cart_id.load().unwrap().as_deref(), Some("cart_01"));
//!
//! cart_id.clear().unwrap();
//! assert!(cart_id.load().unwrap().is_none());
//! ```

mod error;
mod kv;
mod slot;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use slot::Slot;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore, Slot};
}
