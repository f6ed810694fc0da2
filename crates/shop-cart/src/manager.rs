//! The cart state manager.

use std::sync::Arc;

use shop_cache::{Cache, Slot};
use shop_commerce::{Cart, CartId, LineItemId, RegionId, VariantId};
use shop_data::StoreApi;
use tokio::sync::{watch, Mutex};

use crate::notice::{CartNotice, Mutation};
use crate::{CartError, CartSnapshot};

/// Key the cart id is persisted under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "medusa_cart_id";

/// Owns the shopper's cart: the persisted cart id, the last snapshot from the
/// service and the panel/notice flags around it.
///
/// Mutations hold an async lock across the remote call and the state
/// replacement, so two concurrent adds apply one after the other and neither
/// publishes a stale cart over the other's result. Reads go through
/// [`snapshot`](Self::snapshot) or a [`subscribe`](Self::subscribe)d
/// receiver and never wait on that lock.
///
/// The remove operation deletes the line and then re-fetches the cart. Both
/// calls run under the lock, but a different client touching the same cart
/// between them is not prevented.
pub struct CartManager<A> {
    api: A,
    cart_id: Slot<CartId>,
    region_id: RegionId,
    lock: Mutex<()>,
    state: watch::Sender<CartSnapshot>,
}

impl<A: StoreApi> CartManager<A> {
    /// Create a manager that creates carts in `region_id` and persists the
    /// cart id in `cache` under [`DEFAULT_CART_KEY`].
    pub fn new(api: A, cache: Cache, region_id: RegionId) -> Self {
        Self::with_storage_key(api, cache, region_id, DEFAULT_CART_KEY)
    }

    /// Like [`new`](Self::new) with a custom storage key.
    pub fn with_storage_key(
        api: A,
        cache: Cache,
        region_id: RegionId,
        key: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(CartSnapshot::default());
        Self {
            api,
            cart_id: Slot::new(cache, key),
            region_id,
            lock: Mutex::new(()),
            state,
        }
    }

    /// Region new carts are created in.
    pub fn region_id(&self) -> &RegionId {
        &self.region_id
    }

    /// The underlying store API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current state.
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.state.subscribe()
    }

    /// Sum of line-item quantities in the current cart.
    pub fn item_count(&self) -> i64 {
        self.state.borrow().item_count()
    }

    /// Restore the persisted cart.
    ///
    /// A stored id the service no longer recognizes is cleared and the state
    /// left empty; no new cart is created and no error is returned for it.
    pub async fn load(&self) -> Result<CartSnapshot, CartError> {
        let _guard = self.lock.lock().await;
        self.publish(|s| s.is_loading = true);

        match self.fetch_persisted().await {
            Ok(cart) => Ok(self.publish(|s| {
                s.cart = cart.map(Arc::new);
                s.is_loading = false;
            })),
            Err(e) => {
                self.publish(|s| s.is_loading = false);
                Err(e)
            }
        }
    }

    /// Re-read the cart from the service.
    pub async fn refresh(&self) -> Result<CartSnapshot, CartError> {
        self.load().await
    }

    /// Add `quantity` of a variant, creating a cart first if needed.
    ///
    /// Opens the cart panel on success. On failure a [`CartNotice`] is
    /// published before the error is returned.
    pub async fn add_item(
        &self,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<CartSnapshot, CartError> {
        let _guard = self.lock.lock().await;
        tracing::debug!(variant_id = %variant_id, quantity, "adding to cart");

        let result = async {
            let cart = self.ensure_cart().await?;
            let cart = self.api.add_line_item(&cart.id, variant_id, quantity).await?;
            Ok::<_, CartError>(cart)
        }
        .await;

        match result {
            Ok(cart) => {
                tracing::info!(cart_id = %cart.id, variant_id = %variant_id, quantity, "added to cart");
                Ok(self.publish(|s| {
                    s.cart = Some(Arc::new(cart));
                    s.is_open = true;
                    s.notice = None;
                }))
            }
            Err(e) => Err(self.reject(Mutation::Add, e)),
        }
    }

    /// Set a line item's quantity.
    pub async fn update_item(
        &self,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<CartSnapshot, CartError> {
        let _guard = self.lock.lock().await;
        tracing::debug!(line_item_id = %line_item_id, quantity, "updating line item");

        let result = async {
            let cart_id = self.cart_id.load()?.ok_or(CartError::NoCart)?;
            let cart = self
                .api
                .update_line_item(&cart_id, line_item_id, quantity)
                .await?;
            Ok::<_, CartError>(cart)
        }
        .await;

        match result {
            Ok(cart) => {
                tracing::debug!(cart_id = %cart.id, line_item_id = %line_item_id, quantity, "updated line item");
                Ok(self.publish(|s| {
                    s.cart = Some(Arc::new(cart));
                    s.notice = None;
                }))
            }
            Err(e) => Err(self.reject(Mutation::Update, e)),
        }
    }

    /// Remove a line item and re-fetch the cart.
    pub async fn remove_item(&self, line_item_id: &LineItemId) -> Result<CartSnapshot, CartError> {
        let _guard = self.lock.lock().await;

        let result = async {
            let cart_id = self.cart_id.load()?.ok_or(CartError::NoCart)?;
            let deletion = self.api.delete_line_item(&cart_id, line_item_id).await?;
            tracing::debug!(cart_id = %cart_id, line_item_id = %line_item_id, deleted = deletion.deleted, "deleted line item");
            let cart = self.api.retrieve_cart(&cart_id).await?;
            Ok::<_, CartError>(cart)
        }
        .await;

        match result {
            Ok(cart) => {
                tracing::info!(cart_id = %cart.id, line_item_id = %line_item_id, "removed from cart");
                Ok(self.publish(|s| s.cart = Some(Arc::new(cart))))
            }
            Err(e) => {
                tracing::error!(line_item_id = %line_item_id, error = %e, "failed to remove line item");
                Err(e)
            }
        }
    }

    /// Drop the persisted cart id and the local state.
    ///
    /// The remote cart is left untouched.
    pub async fn forget(&self) -> Result<CartSnapshot, CartError> {
        let _guard = self.lock.lock().await;
        self.cart_id.clear()?;
        tracing::info!("forgot cart");
        Ok(self.publish(|s| *s = CartSnapshot::default()))
    }

    /// Show the cart panel.
    pub fn open_cart(&self) -> CartSnapshot {
        self.publish(|s| s.is_open = true)
    }

    /// Hide the cart panel.
    pub fn close_cart(&self) -> CartSnapshot {
        self.publish(|s| s.is_open = false)
    }

    /// Clear the last notice.
    pub fn dismiss_notice(&self) -> CartSnapshot {
        self.publish(|s| s.notice = None)
    }

    /// Fetch the cart behind the persisted id, clearing an id that no longer
    /// resolves.
    async fn fetch_persisted(&self) -> Result<Option<Cart>, CartError> {
        let Some(cart_id) = self.cart_id.load()? else {
            tracing::debug!("no persisted cart");
            return Ok(None);
        };

        match self.api.retrieve_cart(&cart_id).await {
            Ok(cart) => {
                tracing::debug!(cart_id = %cart_id, items = cart.items.len(), "loaded cart");
                Ok(Some(cart))
            }
            Err(e) => {
                tracing::warn!(cart_id = %cart_id, error = %e, "stored cart could not be retrieved, clearing");
                self.cart_id.clear()?;
                Ok(None)
            }
        }
    }

    /// The persisted cart, or a fresh one in the configured region.
    async fn ensure_cart(&self) -> Result<Cart, CartError> {
        if let Some(cart) = self.fetch_persisted().await? {
            return Ok(cart);
        }

        let cart = self.api.create_cart(&self.region_id).await?;
        self.cart_id.store(&cart.id)?;
        tracing::info!(cart_id = %cart.id, region_id = %self.region_id, "created cart");
        Ok(cart)
    }

    fn reject(&self, mutation: Mutation, err: CartError) -> CartError {
        let notice = CartNotice::classify(mutation, &err.message());
        tracing::warn!(?mutation, ?notice, error = %err, "cart mutation failed");
        self.publish(|s| s.notice = Some(notice));
        err
    }

    fn publish(&self, f: impl FnOnce(&mut CartSnapshot)) -> CartSnapshot {
        self.state.send_modify(f);
        self.state.borrow().clone()
    }
}
