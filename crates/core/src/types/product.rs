//! Catalog product snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{ProductId, price::Price};

/// A product as it was when it was read from the catalog.
///
/// Cart lines keep a full copy so the cart can be rendered without another
/// catalog round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    pub price: Price,
    /// Primary image URL, or a comma-separated list of image URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_level: Option<i64>,
    /// Variant descriptors, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<serde_json::Value>,
}

impl Product {
    /// Minimal product with just the fields the cart needs.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            description: None,
            category: None,
            slug: None,
            tags: Vec::new(),
            stock_level: None,
            variants: None,
        }
    }

    /// All image URLs, splitting a comma-separated `image` field.
    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.image
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// First image URL, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images().next()
    }

    /// Whether the catalog reports the product as out of stock.
    ///
    /// A missing stock level means the catalog does not track stock.
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.stock_level.is_some_and(|level| level <= 0)
    }
}
