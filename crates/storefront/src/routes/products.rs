//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use dropship_core::{Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::ProductPage;
use crate::error::Result;
use crate::state::AppState;

/// Products per page when the client doesn't ask.
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductPage>> {
    let page = state
        .commerce()
        .list_products(
            query.page.unwrap_or(1),
            query.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let product = state.commerce().get_product(&ProductId::from(id)).await?;
    Ok(Json(product))
}
