//! The store API seam and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use shop_commerce::catalog::Product;
use shop_commerce::{Cart, CartId, LineItemId, ProductId, RegionId, VariantId};

use crate::config::StoreConfig;
use crate::types::{Deletion, ProductQuery, Region};
use crate::wire::{self, CartEnvelope, ProductEnvelope, ProductsEnvelope, RegionsEnvelope, WireDeletion};
use crate::FetchError;

/// Header carrying the storefront's publishable key.
pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// Relations expanded on every product request so that prices, calculated
/// prices, stock levels and option titles arrive in one response.
pub const PRODUCT_FIELDS: &str = "*variants.calculated_price,*variants.prices,\
*variants.options,*variants.options.option,\
*variants.inventory_items.inventory.location_levels,*options,*options.values";

/// Operations the storefront needs from the commerce service.
///
/// Implemented over HTTP by [`StoreClient`]; tests substitute an in-memory
/// fake.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Create an empty cart in a region.
    async fn create_cart(&self, region_id: &RegionId) -> Result<Cart, FetchError>;

    /// Fetch a cart by id.
    async fn retrieve_cart(&self, cart_id: &CartId) -> Result<Cart, FetchError>;

    /// Add a variant to a cart.
    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<Cart, FetchError>;

    /// Set the quantity of an existing line item.
    async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<Cart, FetchError>;

    /// Remove a line item. Returns only an acknowledgement, not the cart.
    async fn delete_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<Deletion, FetchError>;

    /// Look a product up by handle.
    async fn get_product_by_handle(
        &self,
        handle: &str,
        region_id: &RegionId,
    ) -> Result<Option<Product>, FetchError>;

    /// Fetch a product by id.
    async fn get_product(
        &self,
        product_id: &ProductId,
        region_id: &RegionId,
    ) -> Result<Option<Product>, FetchError>;

    /// List products.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, FetchError>;

    /// List selling regions.
    async fn list_regions(&self) -> Result<Vec<Region>, FetchError>;
}

/// HTTP client for the store API.
///
/// Requests are sent once; failures are returned to the caller without retry.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Create a new client from configuration.
    pub fn new(config: StoreConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.publishable_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| FetchError::Config("publishable key is not a valid header value".into()))?;
            headers.insert(PUBLISHABLE_KEY_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FetchError> {
        tracing::debug!(endpoint, "store request");
        let resp = request.send().await.map_err(|e| FetchError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(endpoint, status, "store request failed");
            return Err(FetchError::Api {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        resp.json().await.map_err(|e| FetchError::Deserialization {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }

    async fn cart_request(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Cart, FetchError> {
        let envelope: CartEnvelope = self.send(endpoint, request).await?;
        wire::cart_from_wire(endpoint, envelope.cart)
    }
}

#[async_trait]
impl StoreApi for StoreClient {
    async fn create_cart(&self, region_id: &RegionId) -> Result<Cart, FetchError> {
        let endpoint = "POST /store/carts";
        let url = self.config.endpoint("/store/carts")?;
        let request = self.http.post(url).json(&json!({ "region_id": region_id }));
        self.cart_request(endpoint, request).await
    }

    async fn retrieve_cart(&self, cart_id: &CartId) -> Result<Cart, FetchError> {
        let endpoint = format!("GET /store/carts/{}", cart_id);
        let url = self.config.endpoint(&format!("/store/carts/{}", cart_id))?;
        self.cart_request(&endpoint, self.http.get(url)).await
    }

    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<Cart, FetchError> {
        let path = format!("/store/carts/{}/line-items", cart_id);
        let endpoint = format!("POST {}", path);
        let url = self.config.endpoint(&path)?;
        let request = self.http.post(url).json(&json!({
            "variant_id": variant_id,
            "quantity": quantity,
        }));
        self.cart_request(&endpoint, request).await
    }

    async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<Cart, FetchError> {
        let path = format!("/store/carts/{}/line-items/{}", cart_id, line_item_id);
        let endpoint = format!("POST {}", path);
        let url = self.config.endpoint(&path)?;
        let request = self.http.post(url).json(&json!({ "quantity": quantity }));
        self.cart_request(&endpoint, request).await
    }

    async fn delete_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<Deletion, FetchError> {
        let path = format!("/store/carts/{}/line-items/{}", cart_id, line_item_id);
        let endpoint = format!("DELETE {}", path);
        let url = self.config.endpoint(&path)?;
        let deletion: WireDeletion = self.send(&endpoint, self.http.delete(url)).await?;
        Ok(deletion.into())
    }

    async fn get_product_by_handle(
        &self,
        handle: &str,
        region_id: &RegionId,
    ) -> Result<Option<Product>, FetchError> {
        let query = ProductQuery::new().handle(handle).region(region_id).limit(1);
        Ok(self.list_products(&query).await?.into_iter().next())
    }

    async fn get_product(
        &self,
        product_id: &ProductId,
        region_id: &RegionId,
    ) -> Result<Option<Product>, FetchError> {
        let path = format!("/store/products/{}", product_id);
        let endpoint = format!("GET {}", path);
        let url = self.config.endpoint(&path)?;
        let request = self
            .http
            .get(url)
            .query(&[("region_id", region_id.as_str()), ("fields", PRODUCT_FIELDS)]);

        match self.send::<ProductEnvelope>(&endpoint, request).await {
            Ok(envelope) => Ok(Some(wire::product_from_wire(envelope.product))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, FetchError> {
        let endpoint = "GET /store/products";
        let url = self.config.endpoint("/store/products")?;

        let mut params: Vec<(&str, String)> = vec![("fields", PRODUCT_FIELDS.to_string())];
        if let Some(handle) = &query.handle {
            params.push(("handle", handle.clone()));
        }
        if let Some(region_id) = &query.region_id {
            params.push(("region_id", region_id.to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let envelope: ProductsEnvelope = self.send(endpoint, self.http.get(url).query(&params)).await?;
        Ok(envelope
            .products
            .into_iter()
            .map(wire::product_from_wire)
            .collect())
    }

    async fn list_regions(&self) -> Result<Vec<Region>, FetchError> {
        let endpoint = "GET /store/regions";
        let url = self.config.endpoint("/store/regions")?;
        let envelope: RegionsEnvelope = self.send(endpoint, self.http.get(url)).await?;
        Ok(envelope
            .regions
            .into_iter()
            .filter_map(wire::region_from_wire)
            .collect())
    }
}
