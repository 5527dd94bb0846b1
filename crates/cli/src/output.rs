//! Plain-text rendering of catalog, cart, and order data.

#![allow(clippy::print_stdout)]

use std::fmt::Write as _;

use dropship_cart::{CartStorage, CartStore};
use dropship_core::{CheckoutSession, Order, Product};
use dropship_storefront::api::ProductPage;

/// Print command output.
pub fn emit(text: &str) {
    if !text.is_empty() {
        println!("{}", text.trim_end());
    }
}

pub fn product_page(page: &ProductPage) -> String {
    let mut out = String::new();
    for product in &page.products {
        let _ = writeln!(
            out,
            "{:>8}  {:<40}  {:>10}",
            product.id,
            product.name,
            product.price.display()
        );
    }
    let _ = writeln!(
        out,
        "page {} ({} per page), {} products",
        page.page, page.size, page.total
    );
    out
}

pub fn product(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", product.name, product.id);
    let _ = writeln!(out, "price: {}", product.price.display());
    if let Some(category) = &product.category {
        let _ = writeln!(out, "category: {category}");
    }
    if let Some(stock) = product.stock_level {
        let _ = writeln!(out, "in stock: {stock}");
    }
    if !product.tags.is_empty() {
        let _ = writeln!(out, "tags: {}", product.tags.join(", "));
    }
    for image in product.images() {
        let _ = writeln!(out, "image: {image}");
    }
    if let Some(description) = &product.description {
        let _ = writeln!(out, "\n{description}");
    }
    out
}

pub fn cart<S: CartStorage>(cart: &CartStore<S>) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for line in cart.items() {
        let _ = writeln!(
            out,
            "{:>8}  {:<32} {:>4} x {:>10} = {:>10}",
            line.product_id(),
            line.product().name,
            line.quantity(),
            line.unit_price().display(),
            line.line_total().display()
        );
    }
    let _ = writeln!(
        out,
        "{} items, total {}",
        cart.total_items(),
        cart.total_price().display()
    );
    out
}

pub fn order(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order #{} ({:?})", order.id, order.status);
    let _ = writeln!(out, "placed: {}", order.created_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "email: {}", order.customer_email);
    let _ = writeln!(out, "ship to: {}", order.shipping_address);
    for item in &order.items {
        let name = item
            .product_name
            .as_deref()
            .unwrap_or_else(|| item.product_id.as_str());
        let _ = writeln!(
            out,
            "  {} x {} @ {}",
            item.quantity,
            name,
            item.price_per_unit.display()
        );
    }
    let _ = writeln!(out, "total: {}", order.total_amount.display());
    if let Some(tracking) = &order.tracking_number {
        let _ = writeln!(out, "tracking: {tracking}");
    }
    out
}

pub fn payment(session: &CheckoutSession) -> String {
    match &session.redirect_url {
        Some(url) => format!("Complete payment at {url}\n"),
        None => format!("Payment session {}\n", session.session_id),
    }
}
