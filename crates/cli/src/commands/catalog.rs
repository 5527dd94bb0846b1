//! Catalog browsing commands.

use dropship_core::ProductId;

use super::{CliError, client};
use crate::output;

/// List one page of products.
pub async fn products(page: u32, size: u32) -> Result<String, CliError> {
    let page = client()?.list_products(page, size).await?;
    Ok(output::product_page(&page))
}

/// Show one product.
pub async fn product(id: &str) -> Result<String, CliError> {
    let product = client()?.get_product(&ProductId::from(id)).await?;
    Ok(output::product(&product))
}
