//! JSON shapes spoken by the commerce API and their conversions.
//!
//! The API sends prices as JSON floats in major units and timestamps as
//! ISO 8601 strings that may lack an offset. Everything is converted into
//! the exact `dropship_core` types at this boundary.

use chrono::{DateTime, NaiveDateTime, Utc};
use dropship_core::{
    CheckoutSession, CurrencyCode, Email, FulfillmentStatus, Order, OrderItem, OrderItemId,
    OrderId, OrderLine, OrderRequest, OrderStatus, PaymentStatus, Price, PriceError, Product,
    ProductId,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ProductPage};

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ProductWire {
    id: ProductId,
    #[serde(alias = "title")]
    name: String,
    price: f64,
    #[serde(default, alias = "image_url")]
    image: Option<String>,
    #[serde(default)]
    images: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    ai_description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    stock_level: Option<i64>,
    #[serde(default)]
    variants: Option<serde_json::Value>,
}

impl ProductWire {
    pub(crate) fn into_product(self, currency: CurrencyCode) -> Result<Product, ApiError> {
        let price = Price::from_f64(self.price, currency)
            .map_err(|e| ApiError::InvalidData(format!("product {}: {e}", self.id)))?;

        let tags = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect();

        Ok(Product {
            id: self.id,
            name: self.name,
            price,
            image: self.image.or(self.images),
            description: self.description.or(self.ai_description),
            category: self.category,
            slug: self.slug,
            tags,
            stock_level: self.stock_level,
            variants: self.variants,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductListWire {
    products: Vec<ProductWire>,
    total: u64,
    page: u32,
    size: u32,
}

impl ProductListWire {
    pub(crate) fn into_page(self, currency: CurrencyCode) -> Result<ProductPage, ApiError> {
        let products = self
            .products
            .into_iter()
            .map(|product| product.into_product(currency))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProductPage {
            products,
            total: self.total,
            page: self.page,
            size: self.size,
        })
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct OrderLineWire<'a> {
    product_id: &'a ProductId,
    quantity: u32,
    price_per_unit: f64,
}

impl<'a> From<&'a OrderLine> for OrderLineWire<'a> {
    fn from(line: &'a OrderLine) -> Self {
        Self {
            product_id: &line.product_id,
            quantity: line.quantity,
            price_per_unit: line.price_per_unit.amount_f64(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderCreateWire<'a> {
    customer_email: &'a Email,
    customer_name: Option<&'a str>,
    shipping_address: &'a str,
    items: Vec<OrderLineWire<'a>>,
}

impl<'a> From<&'a OrderRequest> for OrderCreateWire<'a> {
    fn from(request: &'a OrderRequest) -> Self {
        Self {
            customer_email: &request.customer_email,
            customer_name: request.customer_name.as_deref(),
            shipping_address: &request.shipping_address,
            items: request.items.iter().map(OrderLineWire::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrderItemProductWire {
    #[serde(alias = "title")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderItemWire {
    id: OrderItemId,
    product_id: ProductId,
    quantity: u32,
    price_per_unit: f64,
    #[serde(default)]
    product: Option<OrderItemProductWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderWire {
    id: OrderId,
    customer_email: Email,
    #[serde(default)]
    customer_name: Option<String>,
    shipping_address: String,
    total_amount: f64,
    #[serde(default)]
    status: OrderStatus,
    #[serde(default)]
    payment_status: PaymentStatus,
    #[serde(default)]
    fulfillment_status: FulfillmentStatus,
    #[serde(default)]
    tracking_number: Option<String>,
    created_at: String,
    #[serde(default)]
    items: Vec<OrderItemWire>,
}

impl OrderWire {
    pub(crate) fn into_order(self, currency: CurrencyCode) -> Result<Order, ApiError> {
        let order_id = self.id;
        let invalid =
            move |e: PriceError| ApiError::InvalidData(format!("order {order_id}: {e}"));

        let items = self
            .items
            .into_iter()
            .map(|item| {
                Ok(OrderItem {
                    id: item.id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price_per_unit: Price::from_f64(item.price_per_unit, currency)
                        .map_err(invalid)?,
                    product_name: item.product.and_then(|p| p.name),
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(Order {
            id: self.id,
            customer_email: self.customer_email,
            customer_name: self.customer_name,
            shipping_address: self.shipping_address,
            total_amount: Price::from_f64(self.total_amount, currency).map_err(invalid)?,
            status: self.status,
            payment_status: self.payment_status,
            fulfillment_status: self.fulfillment_status,
            tracking_number: self.tracking_number,
            created_at: parse_timestamp(&self.created_at)?,
            items,
        })
    }
}

/// Parse an RFC 3339 timestamp, or a naive ISO 8601 one taken as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| ApiError::InvalidData(format!("timestamp '{raw}': {e}")))
}

// =============================================================================
// Hosted payment sessions
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CheckoutSessionRequestWire<'a> {
    items: Vec<OrderLineWire<'a>>,
}

impl<'a> CheckoutSessionRequestWire<'a> {
    pub(crate) fn new(lines: &'a [OrderLine]) -> Self {
        Self {
            items: lines.iter().map(OrderLineWire::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutSessionWire {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl CheckoutSessionWire {
    pub(crate) fn into_session(self) -> Result<CheckoutSession, ApiError> {
        let session_id = self
            .session_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::InvalidData("payment session has no sessionId".to_string()))?;
        Ok(CheckoutSession {
            session_id,
            redirect_url: self.url,
        })
    }
}
