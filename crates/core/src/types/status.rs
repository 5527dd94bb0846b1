//! Order status enums as reported by the commerce API.
//!
//! The API reports statuses as lowercase strings. Values this client does not
//! know about deserialize to `Unknown` instead of failing the whole order.

use serde::{Deserialize, Serialize};

/// Overall order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    #[default]
    Pending,
    Processing,
    Fulfilled,
    Failed,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Whether the order has left the "waiting for payment" stage.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Processing | Self::Shipped | Self::Delivered)
    }
}
