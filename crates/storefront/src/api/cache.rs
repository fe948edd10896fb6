//! Cache types for catalog reads.
//!
//! Only products and listings are cached. The cart is mutable server state
//! and is always read fresh.

use shopfront_core::ProductId;

use super::types::{Product, ProductList};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products { page: u32, category: Option<String> },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductList),
}
