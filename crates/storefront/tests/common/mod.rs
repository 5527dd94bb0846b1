//! Shared fixtures: an in-process stub of the commerce API and a helper to
//! run the storefront router against it. Both listen on ephemeral ports.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dropship_core::CurrencyCode;
use dropship_storefront::{
    build_router,
    config::{CommerceApiConfig, StorefrontConfig},
    state::AppState,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// What the stub has seen and how it should misbehave.
#[derive(Debug, Default)]
pub struct StubState {
    pub products: Vec<Value>,
    pub orders: Vec<Value>,
    pub payment_requests: Vec<Value>,
    pub idempotency_keys: Vec<String>,
    pub authorization: Vec<String>,
    pub product_requests: usize,
    pub fail_orders: bool,
    pub rate_limit_listing: bool,
}

/// Handle to a running stub commerce API.
#[derive(Clone)]
pub struct StubCommerce {
    pub base_url: String,
    state: Arc<Mutex<StubState>>,
}

impl StubCommerce {
    /// Start a stub serving the default catalog.
    pub async fn start() -> Self {
        Self::with_products(default_catalog()).await
    }

    pub async fn with_products(products: Vec<Value>) -> Self {
        let state = Arc::new(Mutex::new(StubState {
            products,
            ..StubState::default()
        }));

        let app = Router::new()
            .route("/products/storefront", get(list_products))
            .route("/products/storefront/{id}", get(get_product))
            .route("/orders/storefront", post(create_order))
            .route("/orders/storefront/{id}", get(get_order))
            .route("/api/checkout", post(create_checkout_session))
            .with_state(Arc::clone(&state));

        let addr = serve(app).await;
        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().expect("stub state poisoned")
    }

    /// Client configuration pointing at this stub.
    pub fn api_config(&self) -> CommerceApiConfig {
        CommerceApiConfig::with_base_url(&self.base_url).expect("stub URL is valid")
    }
}

/// Catalog with two USD products.
pub fn default_catalog() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Desk Lamp",
            "price": 19.99,
            "image_url": "https://cdn.example.com/lamp.jpg",
            "category": "home",
            "tags": "lighting, desk",
            "stock_level": 12
        }),
        json!({
            "id": 2,
            "title": "Ceramic Mug",
            "price": 8.5,
            "images": "https://cdn.example.com/mug-1.jpg,https://cdn.example.com/mug-2.jpg"
        }),
    ]
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    addr
}

/// Run the storefront against `commerce` and return its base URL.
pub async fn start_storefront(commerce: &StubCommerce) -> String {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid IP"),
        port: 0,
        base_url: "http://localhost".to_string(),
        currency: CurrencyCode::USD,
        commerce: commerce.api_config(),
        sentry_dsn: None,
        sentry_environment: None,
    };
    let state = AppState::new(config).expect("Failed to build app state");
    let addr = serve(build_router(state)).await;
    format!("http://{addr}")
}

/// HTTP client that keeps cookies, like a browser profile.
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

// =============================================================================
// Stub handlers
// =============================================================================

type Shared = Arc<Mutex<StubState>>;

fn lock(state: &Shared) -> MutexGuard<'_, StubState> {
    state.lock().expect("stub state poisoned")
}

fn record_auth(stub: &mut StubState, headers: &HeaderMap) {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        stub.authorization.push(value.to_string());
    }
}

fn id_matches(product: &Value, id: &str) -> bool {
    match &product["id"] {
        Value::String(s) => s == id,
        other => other.to_string() == id,
    }
}

#[derive(Deserialize)]
struct Paging {
    skip: usize,
    limit: usize,
}

async fn list_products(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(paging): Query<Paging>,
) -> Response {
    let mut stub = lock(&state);
    record_auth(&mut stub, &headers);

    if stub.rate_limit_listing {
        return (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "7")], "slow down")
            .into_response();
    }

    let products: Vec<Value> = stub
        .products
        .iter()
        .skip(paging.skip)
        .take(paging.limit)
        .cloned()
        .collect();
    Json(json!({
        "products": products,
        "total": stub.products.len(),
        "page": paging.skip / paging.limit.max(1) + 1,
        "size": paging.limit,
    }))
    .into_response()
}

async fn get_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut stub = lock(&state);
    stub.product_requests += 1;

    match stub.products.iter().find(|p| id_matches(p, &id)) {
        Some(product) => Json(product.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Product not found" })),
        )
            .into_response(),
    }
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut stub = lock(&state);
    record_auth(&mut stub, &headers);
    if let Some(key) = headers.get("idempotency-key").and_then(|v| v.to_str().ok()) {
        stub.idempotency_keys.push(key.to_string());
    }

    if stub.fail_orders {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }

    let order_id = stub.orders.len() + 1;
    let items: Vec<Value> = body["items"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            json!({
                "id": i + 1,
                "product_id": item["product_id"],
                "quantity": item["quantity"],
                "price_per_unit": item["price_per_unit"],
            })
        })
        .collect();
    let total: f64 = items
        .iter()
        .map(|item| {
            item["price_per_unit"].as_f64().unwrap_or_default()
                * item["quantity"].as_f64().unwrap_or_default()
        })
        .sum();

    let order = json!({
        "id": order_id,
        "customer_email": body["customer_email"],
        "customer_name": body["customer_name"],
        "shipping_address": body["shipping_address"],
        "total_amount": total,
        "status": "pending",
        "payment_status": "pending",
        "fulfillment_status": "pending",
        "tracking_number": null,
        "created_at": "2024-05-01T12:30:00.123456",
        "items": items,
    });
    stub.orders.push(order.clone());

    (StatusCode::CREATED, Json(order)).into_response()
}

async fn get_order(State(state): State<Shared>, Path(id): Path<usize>) -> Response {
    let stub = lock(&state);
    match id.checked_sub(1).and_then(|i| stub.orders.get(i)) {
        Some(order) => Json(order.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Order not found" })),
        )
            .into_response(),
    }
}

async fn create_checkout_session(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut stub = lock(&state);
    stub.payment_requests.push(body);
    let session_id = format!("cs_test_{}", stub.payment_requests.len());
    Json(json!({
        "sessionId": session_id,
        "url": format!("https://pay.example.com/{session_id}"),
    }))
}
