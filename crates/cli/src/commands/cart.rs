//! Cart commands.
//!
//! The cart lives in the profile directory, so it survives between runs the
//! way a browser's cart survives page reloads.

use dropship_core::ProductId;

use super::{CliError, Profile, client};
use crate::output;

pub fn show(profile: &Profile) -> Result<String, CliError> {
    let cart = profile.open_cart()?;
    Ok(output::cart(&cart))
}

/// Add one unit of a product, read fresh from the catalog.
pub async fn add(profile: &Profile, id: &str) -> Result<String, CliError> {
    let product = client()?.get_product(&ProductId::from(id)).await?;
    let mut cart = profile.open_cart()?;

    if product.price.currency_code != cart.currency() {
        return Err(CliError::CurrencyMismatch {
            id: id.to_owned(),
            product: product.price.currency_code.to_string(),
            cart: cart.currency().to_string(),
        });
    }
    if cart.add_item(&product) {
        tracing::info!(product_id = %product.id, "Added to cart");
    }
    Ok(output::cart(&cart))
}

/// Remove a product's line. An ID that is not in the cart leaves it as is.
pub fn remove(profile: &Profile, id: &str) -> Result<String, CliError> {
    let mut cart = profile.open_cart()?;
    if !cart.remove_item(&ProductId::from(id)) {
        tracing::info!(product_id = id, "Product not in cart");
    }
    Ok(output::cart(&cart))
}

/// Set a line's quantity. Zero or less removes the line.
pub fn set(profile: &Profile, id: &str, quantity: i64) -> Result<String, CliError> {
    let mut cart = profile.open_cart()?;
    let id = ProductId::from(id);
    if cart.line(&id).is_none() {
        tracing::info!(product_id = %id, "Product not in cart");
    }
    cart.update_quantity(&id, quantity);
    Ok(output::cart(&cart))
}

pub fn clear(profile: &Profile) -> Result<String, CliError> {
    let mut cart = profile.open_cart()?;
    cart.clear_cart();
    Ok(output::cart(&cart))
}
