//! REST client for the remote commerce API.
//!
//! Uses `reqwest` with JSON bodies. Product and listing reads are cached
//! with `moka`; cart and order calls always go to the server.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use shopfront_core::{CartItemId, OrderDraft, ProductId};

use super::cache::{CacheKey, CacheValue};
use super::error::ApiError;
use super::types::{
    Cart, CartEnvelope, CartLineInput, DataEnvelope, OrderReceipt, Product, ProductEnvelope,
    ProductList, StatusEnvelope,
};
use super::CommerceApi;
use crate::config::CommerceApiConfig;

/// Longest slice of a response body copied into logs and error messages.
const BODY_SNIPPET_LEN: usize = 200;

/// Client for the remote commerce API.
///
/// Cheap to clone; clones share the HTTP connection pool and the catalog
/// cache.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CommerceClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &CommerceApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_ttl)
            .build();

        Self {
            inner: Arc::new(CommerceClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                cache,
            }),
        }
    }

    /// Endpoint URL for the given path segments below the shop root.
    fn url<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.inner.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode the response body.
    ///
    /// A non-2xx status or a body with `"success": false` becomes
    /// [`ApiError::Server`] carrying the server's message.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: StatusEnvelope = serde_json::from_str(&body).unwrap_or_default();
        if !status.is_success() || envelope.success == Some(false) {
            let message = envelope.message.map_or_else(
                || {
                    let snippet = snippet(&body);
                    if snippet.is_empty() {
                        status.canonical_reason().unwrap_or("request failed").to_string()
                    } else {
                        snippet
                    }
                },
                |message| message.joined(),
            );
            tracing::warn!(
                status = %status,
                context,
                message = %message,
                "Commerce API reported failure"
            );
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::error!(
                error = %source,
                context,
                body = %snippet(&body),
                "Failed to decode commerce API response"
            );
            ApiError::Decode { context, source }
        })
    }

    /// Send a mutating request and return the server's confirmation message.
    async fn execute_message(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<String, ApiError> {
        let envelope: StatusEnvelope = self.execute(request, context).await?;
        Ok(envelope
            .message
            .map(|message| message.joined())
            .unwrap_or_default())
    }
}

impl CommerceApi for CommerceClient {
    // =========================================================================
    // Catalog (cached)
    // =========================================================================

    #[instrument(skip(self))]
    async fn list_products(
        &self,
        page: u32,
        category: Option<&str>,
    ) -> Result<ProductList, ApiError> {
        let cache_key = CacheKey::Products {
            page,
            category: category.map(str::to_owned),
        };

        if let Some(CacheValue::Products(list)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(list);
        }

        let mut url = self.url(["products"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            if let Some(category) = category {
                query.append_pair("category", category);
            }
        }

        let list: ProductList = self
            .execute(self.inner.client.get(url), "GET /products")
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(list.clone()))
            .await;

        Ok(list)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.url(["product", id.as_str()]);
        let envelope: ProductEnvelope = self
            .execute(self.inner.client.get(url), "GET /product/{id}")
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(envelope.product.clone())))
            .await;

        Ok(envelope.product)
    }

    // =========================================================================
    // Cart (never cached)
    // =========================================================================

    #[instrument(skip(self))]
    async fn get_cart(&self) -> Result<Cart, ApiError> {
        let envelope: CartEnvelope = self
            .execute(self.inner.client.get(self.url(["cart"])), "GET /cart")
            .await?;
        Ok(envelope.data)
    }

    #[instrument(skip(self), fields(product_id = %line.product_id, qty = %line.qty))]
    async fn add_to_cart(&self, line: &CartLineInput) -> Result<String, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(["cart"]))
            .json(&DataEnvelope { data: line });
        self.execute_message(request, "POST /cart").await
    }

    #[instrument(skip(self), fields(item_id = %item_id, qty = %line.qty))]
    async fn update_cart_item(
        &self,
        item_id: &CartItemId,
        line: &CartLineInput,
    ) -> Result<String, ApiError> {
        let request = self
            .inner
            .client
            .put(self.url(["cart", item_id.as_str()]))
            .json(&DataEnvelope { data: line });
        self.execute_message(request, "PUT /cart/{id}").await
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    async fn remove_cart_item(&self, item_id: &CartItemId) -> Result<String, ApiError> {
        let request = self.inner.client.delete(self.url(["cart", item_id.as_str()]));
        self.execute_message(request, "DELETE /cart/{id}").await
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<String, ApiError> {
        let request = self.inner.client.delete(self.url(["carts"]));
        self.execute_message(request, "DELETE /carts").await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    #[instrument(skip(self, draft), fields(email = %draft.user.email))]
    async fn submit_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(["order"]))
            .json(&DataEnvelope { data: draft });
        self.execute(request, "POST /order").await
    }
}

/// First characters of a response body, for diagnostics.
fn snippet(body: &str) -> String {
    body.trim().chars().take(BODY_SNIPPET_LEN).collect()
}
