//! Behavior tests for CartManager against an in-memory store API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use shop_cache::Cache;
use shop_cart::{CartError, CartManager, CartNotice, Mutation, DEFAULT_CART_KEY};
use shop_commerce::catalog::Product;
use shop_commerce::{
    Cart, CartId, Currency, LineItem, LineItemId, Money, ProductId, RegionId, VariantId,
};
use shop_data::{Deletion, FetchError, ProductQuery, Region, StoreApi};

// -- Fake store ---------------------------------------------------------------

#[derive(Default)]
struct FakeState {
    carts: HashMap<String, Cart>,
    next_id: u32,
    created: u32,
    fail_next: Option<(u16, String)>,
}

/// In-memory stand-in for the commerce service. Clones share state.
#[derive(Clone, Default)]
struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    fn with_cart(self, cart: Cart) -> Self {
        self.state
            .lock()
            .unwrap()
            .carts
            .insert(cart.id.to_string(), cart);
        self
    }

    /// Make the next mutating call fail with a `{type, message}` body.
    fn fail_next(&self, status: u16, message: &str) {
        self.state.lock().unwrap().fail_next = Some((status, message.to_string()));
    }

    fn carts_created(&self) -> u32 {
        self.state.lock().unwrap().created
    }

    fn take_failure(state: &mut FakeState, endpoint: &str) -> Result<(), FetchError> {
        match state.fail_next.take() {
            Some((status, message)) => Err(FetchError::Api {
                endpoint: endpoint.to_string(),
                status,
                body: json!({ "type": "invalid_data", "message": message }).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Suspend like a network round trip would, letting other tasks run.
    async fn round_trip() {
        tokio::task::yield_now().await;
    }

    fn not_found(endpoint: &str, what: &str) -> FetchError {
        FetchError::Api {
            endpoint: endpoint.to_string(),
            status: 404,
            body: json!({ "type": "not_found", "message": format!("{} not found", what) })
                .to_string(),
        }
    }
}

#[async_trait]
impl StoreApi for FakeStore {
    async fn create_cart(&self, region_id: &RegionId) -> Result<Cart, FetchError> {
        Self::round_trip().await;
        let mut state = self.state.lock().unwrap();
        Self::take_failure(&mut state, "POST /store/carts")?;
        state.next_id += 1;
        state.created += 1;
        let mut cart = Cart::new(format!("cart_{}", state.next_id), Currency::EUR);
        cart.region_id = Some(region_id.clone());
        state.carts.insert(cart.id.to_string(), cart.clone());
        Ok(cart)
    }

    async fn retrieve_cart(&self, cart_id: &CartId) -> Result<Cart, FetchError> {
        Self::round_trip().await;
        let state = self.state.lock().unwrap();
        state
            .carts
            .get(cart_id.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found("GET /store/carts", cart_id.as_str()))
    }

    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<Cart, FetchError> {
        Self::round_trip().await;
        let mut state = self.state.lock().unwrap();
        Self::take_failure(&mut state, "POST /store/carts/line-items")?;
        state.next_id += 1;
        let line_id = format!("cali_{}", state.next_id);
        let cart = state
            .carts
            .get_mut(cart_id.as_str())
            .ok_or_else(|| Self::not_found("POST /store/carts/line-items", cart_id.as_str()))?;

        match cart.items.iter_mut().find(|i| &i.variant_id == variant_id) {
            Some(line) => line.quantity += quantity,
            None => cart.items.push(
                LineItem::new(
                    line_id,
                    variant_id.clone(),
                    "Paloma Haven",
                    quantity,
                    Money::new(12_000, Currency::EUR),
                )
                .unwrap(),
            ),
        }
        Ok(cart.clone())
    }

    async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<Cart, FetchError> {
        Self::round_trip().await;
        let mut state = self.state.lock().unwrap();
        Self::take_failure(&mut state, "POST /store/carts/line-items/{id}")?;
        let cart = state
            .carts
            .get_mut(cart_id.as_str())
            .ok_or_else(|| Self::not_found("POST /store/carts/line-items/{id}", cart_id.as_str()))?;
        let line = cart
            .items
            .iter_mut()
            .find(|i| &i.id == line_item_id)
            .ok_or_else(|| Self::not_found("POST /store/carts/line-items/{id}", line_item_id.as_str()))?;
        line.quantity = quantity;
        Ok(cart.clone())
    }

    async fn delete_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<Deletion, FetchError> {
        Self::round_trip().await;
        let mut state = self.state.lock().unwrap();
        Self::take_failure(&mut state, "DELETE /store/carts/line-items/{id}")?;
        let cart = state
            .carts
            .get_mut(cart_id.as_str())
            .ok_or_else(|| Self::not_found("DELETE /store/carts/line-items/{id}", cart_id.as_str()))?;
        cart.items.retain(|i| &i.id != line_item_id);
        Ok(Deletion {
            id: line_item_id.to_string(),
            object: "line-item".to_string(),
            deleted: true,
        })
    }

    async fn get_product_by_handle(
        &self,
        _handle: &str,
        _region_id: &RegionId,
    ) -> Result<Option<Product>, FetchError> {
        Ok(None)
    }

    async fn get_product(
        &self,
        _product_id: &ProductId,
        _region_id: &RegionId,
    ) -> Result<Option<Product>, FetchError> {
        Ok(None)
    }

    async fn list_products(&self, _query: &ProductQuery) -> Result<Vec<Product>, FetchError> {
        Ok(Vec::new())
    }

    async fn list_regions(&self) -> Result<Vec<Region>, FetchError> {
        Ok(Vec::new())
    }
}

fn manager(store: &FakeStore, cache: &Cache) -> CartManager<FakeStore> {
    CartManager::new(store.clone(), cache.clone(), RegionId::new("reg_eu"))
}

fn stored_id(cache: &Cache) -> Option<String> {
    cache.get::<String>(DEFAULT_CART_KEY).unwrap()
}

// -- load ---------------------------------------------------------------------

#[tokio::test]
async fn load_without_stored_id_leaves_state_empty() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    let snapshot = cart.load().await.unwrap();

    assert!(snapshot.cart.is_none());
    assert!(!snapshot.is_loading);
    assert_eq!(store.carts_created(), 0);
}

#[tokio::test]
async fn load_with_deleted_cart_clears_id_without_error() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    cache.set(DEFAULT_CART_KEY, &"cart_gone").unwrap();
    let cart = manager(&store, &cache);

    let snapshot = cart.load().await.unwrap();

    assert!(snapshot.cart.is_none());
    assert!(snapshot.notice.is_none());
    assert!(stored_id(&cache).is_none());
    assert_eq!(store.carts_created(), 0);
}

#[tokio::test]
async fn load_restores_existing_cart() {
    let mut existing = Cart::new("cart_saved", Currency::EUR);
    existing.items.push(
        LineItem::new("cali_1", "variant_01", "Sofa", 2, Money::new(100, Currency::EUR)).unwrap(),
    );
    let store = FakeStore::default().with_cart(existing);
    let cache = Cache::in_memory();
    cache.set(DEFAULT_CART_KEY, &"cart_saved").unwrap();
    let cart = manager(&store, &cache);

    let snapshot = cart.refresh().await.unwrap();

    assert_eq!(snapshot.cart.unwrap().id.as_str(), "cart_saved");
    assert_eq!(cart.item_count(), 2);
}

// -- add ----------------------------------------------------------------------

#[tokio::test]
async fn add_creates_and_persists_cart_and_opens_panel() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    let snapshot = cart.add_item(&VariantId::new("variant_01"), 2).await.unwrap();

    assert!(snapshot.is_open);
    assert_eq!(snapshot.item_count(), 2);
    let cart_id = snapshot.cart.as_ref().unwrap().id.to_string();
    assert_eq!(stored_id(&cache), Some(cart_id));
    assert_eq!(
        snapshot.cart.unwrap().region_id,
        Some(RegionId::new("reg_eu"))
    );
    assert_eq!(store.carts_created(), 1);
}

#[tokio::test]
async fn add_replaces_stale_stored_id() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    cache.set(DEFAULT_CART_KEY, &"cart_gone").unwrap();
    let cart = manager(&store, &cache);

    let snapshot = cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();

    let new_id = snapshot.cart.unwrap().id.to_string();
    assert_ne!(new_id, "cart_gone");
    assert_eq!(stored_id(&cache), Some(new_id));
}

#[tokio::test]
async fn add_reuses_existing_cart() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();
    cart.add_item(&VariantId::new("variant_02"), 1).await.unwrap();

    assert_eq!(store.carts_created(), 1);
    assert_eq!(cart.item_count(), 2);
}

#[tokio::test]
async fn add_with_insufficient_stock_publishes_stock_notice() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);
    cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();
    cart.close_cart();

    store.fail_next(400, "Variant variant_01 has insufficient stock");
    let err = cart
        .add_item(&VariantId::new("variant_01"), 50)
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::Api(_)));
    let snapshot = cart.snapshot();
    assert_eq!(
        snapshot.notice,
        Some(CartNotice::OutOfStock {
            mutation: Mutation::Add
        })
    );
    assert_eq!(
        snapshot.notice.unwrap().message(),
        "There isn't enough stock in the inventory of this item."
    );
    assert_eq!(snapshot.item_count(), 1);
    assert!(!snapshot.is_open);
}

#[tokio::test]
async fn add_with_other_failure_publishes_generic_notice() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    store.fail_next(500, "An unknown error occurred");
    cart.add_item(&VariantId::new("variant_01"), 1)
        .await
        .unwrap_err();

    assert_eq!(cart.snapshot().notice, Some(CartNotice::AddFailed));
    assert!(stored_id(&cache).is_none());

    let snapshot = cart.dismiss_notice();
    assert!(snapshot.notice.is_none());
}

#[tokio::test]
async fn successful_add_clears_previous_notice() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    store.fail_next(500, "boom");
    cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap_err();
    let snapshot = cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();

    assert!(snapshot.notice.is_none());
}

#[tokio::test]
async fn concurrent_adds_are_serialized() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    let a = VariantId::new("variant_01");
    let b = VariantId::new("variant_02");
    let (first, second) = tokio::join!(cart.add_item(&a, 1), cart.add_item(&b, 1));
    first.unwrap();
    second.unwrap();

    // Both adds landed in one remote cart and the last snapshot has both.
    assert_eq!(store.carts_created(), 1);
    let id = stored_id(&cache).unwrap();
    let remote = store.retrieve_cart(&CartId::new(id.as_str())).await.unwrap();
    assert_eq!(remote.items.len(), 2);
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.snapshot().cart.unwrap().id.as_str(), id);
}

#[tokio::test]
async fn concurrent_add_and_update_do_not_interleave() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    let first = cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();
    let line = first.cart.unwrap().items[0].id.clone();

    let variant_02 = VariantId::new("variant_02");
    let (added, updated) = tokio::join!(
        cart.add_item(&variant_02, 1),
        cart.update_item(&line, 5)
    );
    added.unwrap();
    updated.unwrap();

    assert_eq!(store.carts_created(), 1);
    assert_eq!(cart.item_count(), 6);
}

// -- update -------------------------------------------------------------------

#[tokio::test]
async fn update_without_cart_is_no_cart() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    let err = cart
        .update_item(&LineItemId::new("cali_1"), 2)
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::NoCart));
    assert_eq!(cart.snapshot().notice, Some(CartNotice::UpdateFailed));
}

#[tokio::test]
async fn update_sets_quantity() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);
    let snapshot = cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();
    let line_id = snapshot.cart.unwrap().items[0].id.clone();

    let snapshot = cart.update_item(&line_id, 5).await.unwrap();

    assert_eq!(snapshot.item_count(), 5);
}

#[tokio::test]
async fn update_with_insufficient_stock_uses_update_wording() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);
    let snapshot = cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();
    let line_id = snapshot.cart.unwrap().items[0].id.clone();

    store.fail_next(400, "Insufficient inventory at location");
    cart.update_item(&line_id, 99).await.unwrap_err();

    let notice = cart.snapshot().notice.unwrap();
    assert_eq!(
        notice.message(),
        "You can’t add more of this item (Not enough stock available)."
    );
    assert_eq!(cart.item_count(), 1);
}

// -- remove -------------------------------------------------------------------

#[tokio::test]
async fn add_then_remove_restores_item_count() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);
    cart.add_item(&VariantId::new("variant_01"), 2).await.unwrap();
    let before = cart.item_count();

    let snapshot = cart.add_item(&VariantId::new("variant_02"), 3).await.unwrap();
    let added = snapshot
        .cart
        .unwrap()
        .line_item_by_variant(&VariantId::new("variant_02"))
        .unwrap()
        .id
        .clone();
    let snapshot = cart.remove_item(&added).await.unwrap();

    assert_eq!(snapshot.item_count(), before);
}

#[tokio::test]
async fn remove_without_cart_is_no_cart_and_no_notice() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    let err = cart
        .remove_item(&LineItemId::new("cali_1"))
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::NoCart));
    assert!(cart.snapshot().notice.is_none());
}

#[tokio::test]
async fn remove_failure_keeps_state() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);
    let snapshot = cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();
    let line_id = snapshot.cart.unwrap().items[0].id.clone();

    store.fail_next(500, "insufficient stock");
    cart.remove_item(&line_id).await.unwrap_err();

    let snapshot = cart.snapshot();
    assert_eq!(snapshot.item_count(), 1);
    assert!(snapshot.notice.is_none());
}

// -- panel, forget, observers -------------------------------------------------

#[tokio::test]
async fn open_and_close_toggle_panel() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);

    assert!(cart.open_cart().is_open);
    assert!(!cart.close_cart().is_open);
}

#[tokio::test]
async fn forget_clears_id_and_state() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);
    cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();

    let snapshot = cart.forget().await.unwrap();

    assert!(snapshot.cart.is_none());
    assert!(stored_id(&cache).is_none());
    assert_eq!(cart.item_count(), 0);
}

#[tokio::test]
async fn subscribers_see_published_snapshots() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = manager(&store, &cache);
    let mut rx = cart.subscribe();

    cart.add_item(&VariantId::new("variant_01"), 4).await.unwrap();

    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert_eq!(seen.item_count(), 4);
    assert!(seen.is_open);
}

#[tokio::test]
async fn custom_storage_key_is_used() {
    let store = FakeStore::default();
    let cache = Cache::in_memory();
    let cart = CartManager::with_storage_key(
        store.clone(),
        cache.clone(),
        RegionId::new("reg_eu"),
        "my_cart",
    );

    cart.add_item(&VariantId::new("variant_01"), 1).await.unwrap();

    assert!(cache.exists("my_cart").unwrap());
    assert!(!cache.exists(DEFAULT_CART_KEY).unwrap());
}

#[tokio::test]
async fn persisted_id_survives_manager_restart() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("state.json");
    let store = FakeStore::default();

    {
        let cache = Cache::open_file(&state_file).unwrap();
        let cart = manager(&store, &cache);
        cart.add_item(&VariantId::new("variant_01"), 3).await.unwrap();
    }

    let cache = Cache::open_file(&state_file).unwrap();
    let cart = manager(&store, &cache);
    let snapshot = cart.load().await.unwrap();

    assert_eq!(snapshot.item_count(), 3);
    assert_eq!(store.carts_created(), 1);
}
