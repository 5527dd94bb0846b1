//! Order submission and confirmation types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    Email, FulfillmentStatus, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId,
    price::{CurrencyCode, Price},
};

/// One line of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price at the time the product was put in the cart.
    pub price_per_unit: Price,
}

/// An order as submitted by the storefront.
///
/// The commerce API recomputes the total from its own prices; `price_per_unit`
/// is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_email: Email,
    pub customer_name: Option<String>,
    pub shipping_address: String,
    pub items: Vec<OrderLine>,
}

impl OrderRequest {
    /// Expected order total from the submitted unit prices, capped at the
    /// largest decimal amount.
    #[must_use]
    pub fn expected_total(&self, currency_code: CurrencyCode) -> Price {
        let amount = self.items.iter().fold(Decimal::ZERO, |total, line| {
            total.saturating_add(line.price_per_unit.saturating_times(line.quantity).amount)
        });
        Price::new(amount, currency_code)
    }
}

/// A line of a confirmed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_per_unit: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

/// An order as recorded by the commerce API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_email: Email,
    pub customer_name: Option<String>,
    pub shipping_address: String,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// A hosted-payment session created by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    /// Where to send the buyer. Absent when the provider's client library
    /// performs the redirect from `session_id` alone.
    pub redirect_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_total() {
        let request = OrderRequest {
            customer_email: Email::parse("buyer@example.com").unwrap(),
            customer_name: None,
            shipping_address: "1 Main St".to_string(),
            items: vec![
                OrderLine {
                    product_id: ProductId::from("a"),
                    quantity: 2,
                    price_per_unit: Price::from_cents(1050, CurrencyCode::USD),
                },
                OrderLine {
                    product_id: ProductId::from("b"),
                    quantity: 1,
                    price_per_unit: Price::from_cents(99, CurrencyCode::USD),
                },
            ],
        };

        let total = request.expected_total(CurrencyCode::USD);
        assert_eq!(total.amount, Decimal::new(2199, 2));
    }
}
