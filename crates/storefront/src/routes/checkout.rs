//! Checkout route handlers.

use axum::{Json, extract::State, http::StatusCode};
use dropship_core::{CheckoutSession, Order};
use tracing::instrument;

use crate::cart::SessionCart;
use crate::checkout::{self, CheckoutDetails};
use crate::error::Result;
use crate::state::AppState;

/// Place an order for the session's cart.
///
/// Responds `201 Created` with the recorded order. The cart is emptied only
/// when the order was accepted.
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Json(details): Json<CheckoutDetails>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = checkout::place_order(state.commerce(), &mut cart.store, &details).await?;
    cart.save().await;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Start a hosted-payment session for the session's cart.
#[instrument(skip_all)]
pub async fn create_session(
    State(state): State<AppState>,
    cart: SessionCart,
) -> Result<Json<CheckoutSession>> {
    let session = checkout::start_payment(state.commerce(), &cart.store).await?;
    Ok(Json(session))
}
