//! Remote commerce API client.
//!
//! # Architecture
//!
//! - One typed method per REST endpoint, each returning `Result<T, ApiError>`
//! - The server is the source of truth: no local cart, no optimistic updates
//! - Product and listing reads are cached via `moka`; cart reads never are
//!
//! # Endpoints
//!
//! All paths are relative to `{base_url}/v2/api/{api_path}`:
//!
//! - `GET /products`, `GET /product/{id}`
//! - `GET /cart`, `POST /cart`, `PUT /cart/{id}`, `DELETE /cart/{id}`, `DELETE /carts`
//! - `POST /order`
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::api::{CommerceApi, CommerceClient};
//!
//! let client = CommerceClient::new(&config.api);
//! let product = client.get_product(&ProductId::new("-L9tH8jxVb2Ka_DYPwng")).await?;
//! client.add_to_cart(&CartLineInput { product_id: product.id, qty: Quantity::ONE }).await?;
//! let cart = client.get_cart().await?;
//! ```

mod cache;
mod client;
pub mod error;
pub mod types;

use std::future::Future;

pub use client::CommerceClient;
pub use error::ApiError;
pub use types::*;

use shopfront_core::{CartItemId, OrderDraft, ProductId};

/// Operations the storefront needs from the remote commerce API.
///
/// Page orchestration is written against this trait so it can run against
/// the real client or an in-memory double.
pub trait CommerceApi: Send + Sync {
    /// `GET /products?page={page}[&category={category}]`
    fn list_products(
        &self,
        page: u32,
        category: Option<&str>,
    ) -> impl Future<Output = Result<ProductList, ApiError>> + Send;

    /// `GET /product/{id}`
    fn get_product(&self, id: &ProductId)
    -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// `GET /cart`
    fn get_cart(&self) -> impl Future<Output = Result<Cart, ApiError>> + Send;

    /// `POST /cart`. Returns the server's confirmation message.
    fn add_to_cart(
        &self,
        line: &CartLineInput,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `PUT /cart/{id}` with the full line.
    fn update_cart_item(
        &self,
        item_id: &CartItemId,
        line: &CartLineInput,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `DELETE /cart/{id}`
    fn remove_cart_item(
        &self,
        item_id: &CartItemId,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `DELETE /carts`
    fn clear_cart(&self) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST /order`
    fn submit_order(
        &self,
        draft: &OrderDraft,
    ) -> impl Future<Output = Result<OrderReceipt, ApiError>> + Send;
}
