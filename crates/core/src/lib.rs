//! Dropship Core - Shared domain types.
//!
//! This crate provides the types used across all Dropship components:
//! - `cart` - Client-side cart store and its storage backends
//! - `storefront` - JSON storefront server and commerce API client
//! - `cli` - Command-line shell over a profile-local cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, prices, emails, product snapshots, and order payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
