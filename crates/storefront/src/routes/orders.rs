//! Order confirmation handler.

use axum::{
    Json,
    extract::{Path, State},
};
use dropship_core::{Order, OrderId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Order confirmation.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    let id: OrderId = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid order id '{id}'")))?;
    let order = state.commerce().get_order(id).await?;
    Ok(Json(order))
}
