//! Wire types for the remote commerce API.
//!
//! Field names follow the API's JSON (`imageUrl`, `final_total`, `orderId`).
//! Response bodies are wrapped in a `success`/`message` envelope; request
//! bodies are wrapped in a `data` envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use shopfront_core::{CartItemId, OrderId, Price, ProductId, Quantity};

// =============================================================================
// Catalog
// =============================================================================

/// A product as the API describes it. Read-only from the client's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// External link shown under the description.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub origin_price: Price,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(rename = "imagesUrl", default)]
    pub images_url: Vec<String>,
    #[serde(default = "enabled", deserialize_with = "flag")]
    pub is_enabled: bool,
}

impl Product {
    /// Whether the sale price is below the original price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.price.is_below(&self.origin_price)
    }

    /// Gallery images, skipping blanks the API leaves in unused slots.
    pub fn gallery(&self) -> impl Iterator<Item = &str> {
        self.images_url
            .iter()
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }
}

/// Listing pagination as returned with `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub has_pre: bool,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub category: String,
}

/// One page of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Pagination,
}

// =============================================================================
// Cart
// =============================================================================

/// Product snapshot embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub title: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub price: Price,
}

/// One product-quantity pairing in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub qty: Quantity,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub final_total: Price,
    pub product: CartProduct,
}

/// The server-owned cart. Replaced wholesale on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub carts: Vec<CartItem>,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub final_total: Price,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.carts.iter().map(|line| line.qty.get()).sum()
    }
}

/// Body of `POST /cart` and `PUT /cart/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineInput {
    pub product_id: ProductId,
    pub qty: Quantity,
}

// =============================================================================
// Orders
// =============================================================================

/// Confirmation returned by `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    #[serde(default)]
    pub total: Price,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub create_at: i64,
    #[serde(default)]
    pub message: String,
}

impl OrderReceipt {
    /// When the order was created, if the server sent a usable timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        if self.create_at <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.create_at, 0)
    }
}

// =============================================================================
// Envelopes
// =============================================================================

/// Request body wrapper: every mutating call sends `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<'a, T> {
    pub data: &'a T,
}

/// The `success`/`message` fields present on every response.
#[derive(Debug, Default, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<ServerMessage>,
}

/// Server messages arrive either as one string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    One(String),
    Many(Vec<String>),
}

impl ServerMessage {
    /// All parts joined into one line.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::One(message) => message.clone(),
            Self::Many(messages) => messages.join("、"),
        }
    }
}

/// `GET /product/{id}` body.
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: Product,
}

/// `GET /cart` body.
#[derive(Debug, Deserialize)]
pub struct CartEnvelope {
    pub data: Cart,
}

const fn enabled() -> bool {
    true
}

/// Accepts `1`/`0` as well as `true`/`false`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Number(value) => value != 0,
    })
}
