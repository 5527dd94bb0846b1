//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (commerce API reachable)
//!
//! # Products
//! GET    /products             - Product listing (?page=&size=)
//! GET    /products/{id}        - Product detail
//!
//! # Cart (session-backed)
//! GET    /cart                 - Cart contents and totals
//! GET    /cart/count           - Cart count badge
//! POST   /cart/items           - Add one unit of a product
//! PUT    /cart/items/{id}      - Set line quantity (<= 0 removes)
//! DELETE /cart/items/{id}      - Remove line
//! DELETE /cart                 - Empty cart
//!
//! # Checkout
//! POST   /checkout             - Place order from cart
//! POST   /checkout/session     - Start hosted payment
//! GET    /orders/{id}          - Order confirmation
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place_order))
        .route("/session", post(checkout::create_session))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/orders/{id}", get(orders::show))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the commerce API is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.commerce().list_products(1, 1).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
