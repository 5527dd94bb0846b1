//! Integration tests for checkout against a stub commerce API.

mod common;

use common::StubCommerce;
use dropship_cart::{CART_STORAGE_KEY, CartStorage, CartStore, FileStorage};
use dropship_core::ProductId;
use dropship_storefront::api::CommerceClient;
use dropship_storefront::checkout::{self, CheckoutDetails, CheckoutError};

fn details() -> CheckoutDetails {
    CheckoutDetails {
        email: "buyer@example.com".to_string(),
        name: Some("Ada Buyer".to_string()),
        shipping_address: "1 Main St, Springfield".to_string(),
    }
}

async fn filled_cart(
    client: &CommerceClient,
    storage: FileStorage,
) -> CartStore<FileStorage> {
    let lamp = client
        .get_product(&ProductId::from(1))
        .await
        .expect("lamp exists");
    let mug = client
        .get_product(&ProductId::from(2))
        .await
        .expect("mug exists");

    let mut cart = CartStore::restore(storage);
    cart.add_item(&lamp);
    cart.add_item(&lamp);
    cart.add_item(&mug);
    cart
}

#[tokio::test]
async fn test_place_order_clears_persisted_cart() {
    let stub = StubCommerce::start().await;
    let client = CommerceClient::new(&stub.api_config()).expect("client");
    let dir = tempfile::tempdir().expect("tempdir");

    let mut cart = filled_cart(&client, FileStorage::open(dir.path()).expect("open")).await;
    let order = checkout::place_order(&client, &mut cart, &details())
        .await
        .expect("order placed");

    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_amount.display(), "$48.48");
    assert!(cart.is_empty());

    // A new session in the same profile starts empty.
    let reopened = CartStore::restore(FileStorage::open(dir.path()).expect("open"));
    assert!(reopened.is_empty());
}

#[tokio::test]
async fn test_failed_order_keeps_cart() {
    let stub = StubCommerce::start().await;
    stub.state().fail_orders = true;
    let client = CommerceClient::new(&stub.api_config()).expect("client");
    let dir = tempfile::tempdir().expect("tempdir");

    let mut cart = filled_cart(&client, FileStorage::open(dir.path()).expect("open")).await;
    let err = checkout::place_order(&client, &mut cart, &details())
        .await
        .expect_err("order rejected");

    assert!(matches!(err, CheckoutError::Api(_)), "got {err:?}");
    assert_eq!(cart.total_items(), 3);

    let stored = cart
        .storage()
        .load(CART_STORAGE_KEY)
        .expect("readable")
        .expect("cart still stored");
    assert!(stored.contains("Desk Lamp"));
}

#[tokio::test]
async fn test_invalid_details_never_reach_api() {
    let stub = StubCommerce::start().await;
    let client = CommerceClient::new(&stub.api_config()).expect("client");
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cart = filled_cart(&client, FileStorage::open(dir.path()).expect("open")).await;

    let mut bad = details();
    bad.email = "nobody".to_string();
    let err = checkout::place_order(&client, &mut cart, &bad)
        .await
        .expect_err("invalid email");

    assert!(err.is_validation());
    assert!(stub.state().orders.is_empty());
    assert_eq!(cart.total_items(), 3);
}

#[tokio::test]
async fn test_start_payment_sends_cart_lines() {
    let stub = StubCommerce::start().await;
    let client = CommerceClient::new(&stub.api_config()).expect("client");
    let dir = tempfile::tempdir().expect("tempdir");
    let cart = filled_cart(&client, FileStorage::open(dir.path()).expect("open")).await;

    let session = checkout::start_payment(&client, &cart)
        .await
        .expect("session created");

    assert_eq!(session.session_id, "cs_test_1");
    assert_eq!(cart.total_items(), 3);

    let state = stub.state();
    let request = state.payment_requests.first().expect("request recorded");
    assert_eq!(request["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(request["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_start_payment_rejects_empty_cart() {
    let stub = StubCommerce::start().await;
    let client = CommerceClient::new(&stub.api_config()).expect("client");
    let cart = CartStore::new(dropship_cart::NoopStorage);

    let err = checkout::start_payment(&client, &cart)
        .await
        .expect_err("empty cart");
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(stub.state().payment_requests.is_empty());
}
