//! End-to-end tests for the storefront HTTP API.
//!
//! Each test runs the router and a stub commerce API on ephemeral ports and
//! drives them with a cookie-keeping client, the way a browser would.

mod common;

use common::{StubCommerce, browser, start_storefront};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn get_json(client: &Client, url: &str) -> (StatusCode, Value) {
    let resp = client.get(url).send().await.expect("request failed");
    let status = resp.status();
    (status, resp.json().await.expect("JSON body"))
}

async fn add_to_cart(client: &Client, base: &str, product_id: Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    (status, resp.json().await.expect("JSON body"))
}

#[tokio::test]
async fn test_health() {
    let stub = StubCommerce::start().await;
    let base = start_storefront(&stub).await;

    let resp = browser()
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = browser()
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let stub = StubCommerce::start().await;
    let base = start_storefront(&stub).await;

    let resp = browser()
        .get(format!("{base}/health"))
        .header("x-request-id", "edge-1234")
        .send()
        .await
        .expect("request failed");
    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("edge-1234")
    );
}

#[tokio::test]
async fn test_product_listing_and_detail() {
    let stub = StubCommerce::start().await;
    let base = start_storefront(&stub).await;
    let client = browser();

    let (status, page) = get_json(&client, &format!("{base}/products?page=1&size=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["products"][0]["name"], "Desk Lamp");
    assert_eq!(page["products"][0]["price"]["amount"], "19.99");
    assert_eq!(page["products"][0]["price"]["currency_code"], "USD");

    let (status, product) = get_json(&client, &format!("{base}/products/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["name"], "Ceramic Mug");

    let (status, body) = get_json(&client, &format!("{base}/products/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_cart_add_update_remove_clear() {
    let stub = StubCommerce::start().await;
    let base = start_storefront(&stub).await;
    let client = browser();

    // Empty to start with
    let (status, cart) = get_json(&client, &format!("{base}/cart")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 0);
    assert_eq!(cart["items"], json!([]));

    // Same product twice merges into one line
    add_to_cart(&client, &base, json!(1)).await;
    let (status, cart) = add_to_cart(&client, &base, json!("1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["subtotal"], "$39.98");

    let (_, cart) = add_to_cart(&client, &base, json!(2)).await;
    assert_eq!(cart["item_count"], 3);
    assert_eq!(cart["subtotal"], "$48.48");

    let (_, count) = get_json(&client, &format!("{base}/cart/count")).await;
    assert_eq!(count["count"], 3);

    // Quantity update
    let cart: Value = client
        .put(format!("{base}/cart/items/2"))
        .json(&json!({ "quantity": 4 }))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("JSON body");
    assert_eq!(cart["item_count"], 6);
    assert_eq!(cart["subtotal"], "$73.98");

    // Zero removes the line
    let cart: Value = client
        .put(format!("{base}/cart/items/1"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("JSON body");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["product_id"], "2");

    // Removing an absent line is a no-op
    let cart: Value = client
        .delete(format!("{base}/cart/items/1"))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("JSON body");
    assert_eq!(cart["item_count"], 4);

    let cart: Value = client
        .delete(format!("{base}/cart"))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("JSON body");
    assert_eq!(cart["item_count"], 0);

    let (_, count) = get_json(&client, &format!("{base}/cart/count")).await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_carts_are_per_browser() {
    let stub = StubCommerce::start().await;
    let base = start_storefront(&stub).await;
    let alice = browser();
    let bob = browser();

    add_to_cart(&alice, &base, json!(1)).await;

    let (_, alice_count) = get_json(&alice, &format!("{base}/cart/count")).await;
    let (_, bob_count) = get_json(&bob, &format!("{base}/cart/count")).await;
    assert_eq!(alice_count["count"], 1);
    assert_eq!(bob_count["count"], 0);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let stub = StubCommerce::start().await;
    let base = start_storefront(&stub).await;
    let client = browser();

    let (status, _) = add_to_cart(&client, &base, json!(404)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, count) = get_json(&client, &format!("{base}/cart/count")).await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_checkout_flow() {
    let stub = StubCommerce::start().await;
    let base = start_storefront(&stub).await;
    let client = browser();

    add_to_cart(&client, &base, json!(1)).await;

    // Payment session leaves the cart alone
    let resp = client
        .post(format!("{base}/checkout/session"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let session: Value = resp.json().await.expect("JSON body");
    assert_eq!(session["session_id"], "cs_test_1");

    // Bad email is the buyer's problem
    let resp = client
        .post(format!("{base}/checkout"))
        .json(&json!({ "email": "nope", "shipping_address": "1 Main St" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("{base}/checkout"))
        .json(&json!({
            "email": "buyer@example.com",
            "name": "Ada Buyer",
            "shipping_address": "1 Main St"
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("JSON body");
    assert_eq!(order["id"], 1);
    assert_eq!(order["status"], "pending");

    // Cart emptied once the order was accepted
    let (_, count) = get_json(&client, &format!("{base}/cart/count")).await;
    assert_eq!(count["count"], 0);

    // Confirmation page data
    let (status, fetched) = get_json(&client, &format!("{base}/orders/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["customer_email"], "buyer@example.com");

    let (status, _) = get_json(&client, &format!("{base}/orders/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_failure_keeps_cart() {
    let stub = StubCommerce::start().await;
    stub.state().fail_orders = true;
    let base = start_storefront(&stub).await;
    let client = browser();

    add_to_cart(&client, &base, json!(2)).await;

    let resp = client
        .post(format!("{base}/checkout"))
        .json(&json!({ "email": "buyer@example.com", "shipping_address": "1 Main St" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let (_, count) = get_json(&client, &format!("{base}/cart/count")).await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let stub = StubCommerce::start().await;
    let base = start_storefront(&stub).await;

    let resp = browser()
        .post(format!("{base}/checkout"))
        .json(&json!({ "email": "buyer@example.com", "shipping_address": "1 Main St" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(stub.state().orders.is_empty());
}
