//! Cart route handlers.
//!
//! The cart itself lives in the session (see [`SessionCart`]); every handler
//! responds with the cart as it stands after the operation.

use axum::{
    Json,
    extract::{Path, State},
};
use dropship_cart::{CartLine, CartStorage, CartStore};
use dropship_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::SessionCart;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// One cart line as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// The whole cart as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub total: Price,
    /// Total formatted for display, e.g. `$19.99`.
    pub subtotal: String,
}

/// Cart count badge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        let product = line.product();
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.primary_image().map(str::to_owned),
            quantity: line.quantity(),
            unit_price: line.unit_price(),
            line_total: line.line_total(),
        }
    }
}

impl<S: CartStorage> From<&CartStore<S>> for CartView {
    fn from(cart: &CartStore<S>) -> Self {
        let total = cart.total_price();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            item_count: cart.total_items(),
            subtotal: total.display(),
            total,
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub product_id: ProductId,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart.
pub async fn show(cart: SessionCart) -> Json<CartView> {
    Json(CartView::from(&cart.store))
}

/// Total item count for the cart badge.
pub async fn count(cart: SessionCart) -> Json<CartCount> {
    Json(CartCount {
        count: cart.store.total_items(),
    })
}

/// Add one unit of a product.
///
/// The product is read from the catalog so the cart holds its current name
/// and price.
#[instrument(skip(state, cart), fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Json(body): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let product = state.commerce().get_product(&body.product_id).await?;

    if product.price.currency_code != cart.store.currency() {
        return Err(AppError::BadRequest(format!(
            "product {} is not sold in {}",
            product.id,
            cart.store.currency()
        )));
    }
    if !cart.store.add_item(&product) {
        return Ok(Json(CartView::from(&cart.store)));
    }
    cart.save().await;

    add_breadcrumb("cart", "Added item", Some(&[("product_id", product.id.as_str())]));
    Ok(Json(CartView::from(&cart.store)))
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(cart, body))]
pub async fn update(
    mut cart: SessionCart,
    Path(id): Path<String>,
    Json(body): Json<UpdateQuantity>,
) -> Json<CartView> {
    if cart.store.update_quantity(&ProductId::from(id), body.quantity) {
        cart.save().await;
    }
    Json(CartView::from(&cart.store))
}

/// Remove a line.
#[instrument(skip(cart))]
pub async fn remove(mut cart: SessionCart, Path(id): Path<String>) -> Json<CartView> {
    if cart.store.remove_item(&ProductId::from(id)) {
        cart.save().await;
    }
    Json(CartView::from(&cart.store))
}

/// Empty the cart.
#[instrument(skip(cart))]
pub async fn clear(mut cart: SessionCart) -> Json<CartView> {
    cart.store.clear_cart();
    cart.save().await;
    Json(CartView::from(&cart.store))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use dropship_cart::MemoryStorage;
    use dropship_core::{CurrencyCode, Product};

    use super::*;

    #[test]
    fn test_cart_view_from_store() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let mut lamp = Product::new("lamp", "Desk Lamp", Price::from_cents(1999, CurrencyCode::USD));
        lamp.image = Some("a.jpg, b.jpg".to_string());
        cart.add_item(&lamp);
        cart.add_item(&lamp);

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "$39.98");
        assert_eq!(view.items[0].image.as_deref(), Some("a.jpg"));
        assert_eq!(view.items[0].line_total, Price::from_cents(3998, CurrencyCode::USD));
    }

    #[test]
    fn test_empty_cart_view() {
        let cart = CartStore::new(MemoryStorage::new());
        let view = CartView::from(&cart);
        assert!(view.items.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, "$0.00");
    }
}
