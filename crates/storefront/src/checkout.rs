//! Checkout: turn a cart into an order or a hosted-payment session.

use dropship_cart::{CartStorage, CartStore};
use dropship_core::{CheckoutSession, Email, EmailError, Order, OrderLine, OrderRequest};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiError, CommerceClient};

/// Buyer details collected at checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutDetails {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub shipping_address: String,
}

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("shipping address is required")]
    MissingAddress,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CheckoutError {
    /// Whether the buyer can fix this by changing their input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyCart | Self::InvalidEmail(_) | Self::MissingAddress
        )
    }
}

/// Order lines for every cart line, at the price captured when added.
pub fn order_lines<S: CartStorage>(cart: &CartStore<S>) -> Vec<OrderLine> {
    cart.items()
        .iter()
        .map(|line| OrderLine {
            product_id: line.product_id().clone(),
            quantity: line.quantity(),
            price_per_unit: line.unit_price(),
        })
        .collect()
}

/// Validate `details` and build the order submission for `cart`.
///
/// # Errors
///
/// Returns a validation error for an empty cart, a malformed email, or a
/// blank shipping address.
pub fn build_order_request<S: CartStorage>(
    cart: &CartStore<S>,
    details: &CheckoutDetails,
) -> Result<OrderRequest, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let customer_email = Email::parse(&details.email)?;

    let shipping_address = details.shipping_address.trim();
    if shipping_address.is_empty() {
        return Err(CheckoutError::MissingAddress);
    }

    let customer_name = details
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned);

    Ok(OrderRequest {
        customer_email,
        customer_name,
        shipping_address: shipping_address.to_owned(),
        items: order_lines(cart),
    })
}

/// Submit the cart as an order.
///
/// The cart is cleared only once the commerce API has accepted the order; on
/// any failure it is left untouched so the buyer can retry.
///
/// # Errors
///
/// Returns a validation error, or `CheckoutError::Api` if submission fails.
#[instrument(skip_all, fields(lines = cart.items().len()))]
pub async fn place_order<S: CartStorage>(
    client: &CommerceClient,
    cart: &mut CartStore<S>,
    details: &CheckoutDetails,
) -> Result<Order, CheckoutError> {
    let request = build_order_request(cart, details)?;
    let order = client.submit_order(&request).await?;

    cart.clear_cart();
    tracing::info!(order_id = %order.id, total = %order.total_amount, "Order placed");
    Ok(order)
}

/// Create a hosted-payment session for the cart. The cart is not modified.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart`, or `CheckoutError::Api` if the
/// session cannot be created.
#[instrument(skip_all, fields(lines = cart.items().len()))]
pub async fn start_payment<S: CartStorage>(
    client: &CommerceClient,
    cart: &CartStore<S>,
) -> Result<CheckoutSession, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let session = client.create_checkout_session(&order_lines(cart)).await?;
    tracing::info!(session_id = %session.session_id, "Payment session created");
    Ok(session)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use dropship_cart::MemoryStorage;
    use dropship_core::{CurrencyCode, Price, Product};

    use super::*;

    fn details(email: &str, address: &str) -> CheckoutDetails {
        CheckoutDetails {
            email: email.to_string(),
            name: Some("  ".to_string()),
            shipping_address: address.to_string(),
        }
    }

    fn filled_cart() -> CartStore<MemoryStorage> {
        let mut cart = CartStore::new(MemoryStorage::new());
        let mug = Product::new("mug", "Mug", Price::from_cents(1250, CurrencyCode::USD));
        cart.add_item(&mug);
        cart.add_item(&mug);
        cart
    }

    #[test]
    fn test_build_order_request() {
        let cart = filled_cart();
        let request =
            build_order_request(&cart, &details(" buyer@example.com ", " 1 Main St ")).unwrap();

        assert_eq!(request.customer_email.as_str(), "buyer@example.com");
        assert_eq!(request.customer_name, None);
        assert_eq!(request.shipping_address, "1 Main St");
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(
            request.expected_total(CurrencyCode::USD),
            cart.total_price()
        );
    }

    #[test]
    fn test_build_order_request_validation() {
        let empty = CartStore::new(MemoryStorage::new());
        assert!(matches!(
            build_order_request(&empty, &details("buyer@example.com", "1 Main St")),
            Err(CheckoutError::EmptyCart)
        ));

        let cart = filled_cart();
        assert!(matches!(
            build_order_request(&cart, &details("not-an-email", "1 Main St")),
            Err(CheckoutError::InvalidEmail(_))
        ));
        assert!(matches!(
            build_order_request(&cart, &details("buyer@example.com", "   ")),
            Err(CheckoutError::MissingAddress)
        ));
    }

    #[test]
    fn test_is_validation() {
        assert!(CheckoutError::EmptyCart.is_validation());
        assert!(CheckoutError::MissingAddress.is_validation());
        assert!(!CheckoutError::Api(ApiError::RateLimited(1)).is_validation());
    }
}
