//! Core types for Dropship.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{CheckoutSession, Order, OrderItem, OrderLine, OrderRequest};
pub use price::{CurrencyCode, Price, PriceError};
pub use product::Product;
pub use status::*;
