//! Cache types for catalog responses.

use dropship_core::{Product, ProductId};

use super::ProductPage;

/// Cache key for products and product listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products { page: u32, size: u32 },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductPage),
}
