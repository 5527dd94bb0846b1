//! Commerce API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; the commerce API is the source of truth
//! - Catalog reads are cached in memory via `moka` (5 minute TTL)
//! - Orders and payment sessions are never cached
//!
//! # Endpoints
//!
//! ```text
//! GET  products/storefront?skip=&limit=   product page
//! GET  products/storefront/{id}           product detail
//! POST orders/storefront                  submit order (201)
//! GET  orders/storefront/{id}             order confirmation
//! POST api/checkout                       hosted-payment session
//! ```

mod cache;
mod wire;

use std::sync::Arc;
use std::time::Duration;

use dropship_core::{
    CheckoutSession, CurrencyCode, Order, OrderId, OrderLine, OrderRequest, Product, ProductId,
};
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::config::CommerceApiConfig;

use cache::{CacheKey, CacheValue};
use wire::{
    CheckoutSessionRequestWire, CheckoutSessionWire, OrderCreateWire, OrderWire, ProductListWire,
    ProductWire,
};

/// Maximum page size the catalog accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors that can occur when talking to the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("commerce API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but carried values we cannot accept.
    #[error("invalid data from commerce API: {0}")]
    InvalidData(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A request URL could not be built.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// One page of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    pub size: u32,
}

// =============================================================================
// CommerceClient
// =============================================================================

/// Client for the commerce API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    currency: CurrencyCode,
    cache: Cache<CacheKey, CacheValue>,
}

impl CommerceClient {
    /// Create a new commerce API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CommerceApiConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
                currency: config.currency,
                cache,
            }),
        })
    }

    /// Currency the API's prices are interpreted in.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.currency
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and decode a JSON response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, ApiError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "Commerce API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&response_text, 200),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&response_text, 500),
                "Failed to parse commerce API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get one page of the catalog. `page` is 1-based; `size` is clamped to
    /// `1..=MAX_PAGE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u32, size: u32) -> Result<ProductPage, ApiError> {
        let page = page.max(1);
        let size = size.clamp(1, MAX_PAGE_SIZE);
        let cache_key = CacheKey::Products { page, size };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut url = self.url("products/storefront")?;
        url.query_pairs_mut()
            .append_pair("skip", &(u64::from(page - 1) * u64::from(size)).to_string())
            .append_pair("limit", &size.to_string());

        let wire: ProductListWire = self
            .execute(self.inner.client.get(url), "product listing")
            .await?;
        let products = wire.into_page(self.inner.currency)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown products, or another error if
    /// the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.url(&format!("products/storefront/{}", encode_segment(id.as_str())))?;
        let wire: ProductWire = self
            .execute(self.inner.client.get(url), &format!("product {id}"))
            .await?;
        let product = wire.into_product(self.inner.currency)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit an order.
    ///
    /// Each call carries a fresh `Idempotency-Key` so the API can drop
    /// duplicates of the same HTTP request replayed by a proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order or the request fails.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn submit_order(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        let url = self.url("orders/storefront")?;
        let http = self
            .inner
            .client
            .post(url)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .json(&OrderCreateWire::from(request));

        let wire: OrderWire = self.execute(http, "order endpoint").await?;
        let order = wire.into_order(self.inner.currency)?;
        tracing::info!(order_id = %order.id, "Order submitted");
        Ok(order)
    }

    /// Get an order for its confirmation page.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown orders, or another error if
    /// the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        let url = self.url(&format!("orders/storefront/{id}"))?;
        let wire: OrderWire = self
            .execute(self.inner.client.get(url), &format!("order {id}"))
            .await?;
        wire.into_order(self.inner.currency)
    }

    /// Create a hosted-payment session for `lines`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns no session ID.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn create_checkout_session(
        &self,
        lines: &[OrderLine],
    ) -> Result<CheckoutSession, ApiError> {
        let url = self.url("api/checkout")?;
        let http = self
            .inner
            .client
            .post(url)
            .json(&CheckoutSessionRequestWire::new(lines));

        let wire: CheckoutSessionWire = self.execute(http, "checkout session endpoint").await?;
        wire.into_session()
    }
}

/// First `max` characters of `s`.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Percent-encode a single path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
