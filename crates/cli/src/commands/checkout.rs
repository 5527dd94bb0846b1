//! Checkout and order commands.

use dropship_core::OrderId;
use dropship_storefront::checkout::{self, CheckoutDetails};

use super::{CliError, Profile, client};
use crate::output;

/// Place an order for the profile's cart. The cart is emptied on success.
pub async fn place_order(
    profile: &Profile,
    email: String,
    shipping_address: String,
    name: Option<String>,
) -> Result<String, CliError> {
    let client = client()?;
    let mut cart = profile.open_cart()?;
    let details = CheckoutDetails {
        email,
        name,
        shipping_address,
    };

    let order = checkout::place_order(&client, &mut cart, &details).await?;
    Ok(output::order(&order))
}

/// Start a hosted payment for the profile's cart.
pub async fn pay(profile: &Profile) -> Result<String, CliError> {
    let client = client()?;
    let cart = profile.open_cart()?;

    let session = checkout::start_payment(&client, &cart).await?;
    Ok(output::payment(&session))
}

/// Show an order.
pub async fn order(id: i64) -> Result<String, CliError> {
    let order = client()?.get_order(OrderId::new(id)).await?;
    Ok(output::order(&order))
}
