//! Dropship Cart - client-side cart state and totals.
//!
//! The cart is an owned [`CartStore`] over an injected [`CartStorage`]
//! backend. Every state-changing mutation writes a versioned snapshot of the
//! line items to the backend; restoring from a missing or damaged snapshot
//! yields an empty cart instead of an error.
//!
//! # Example
//!
//! ```rust
//! use dropship_cart::{CartStore, MemoryStorage};
//! use dropship_core::{CurrencyCode, Price, Product};
//!
//! let mut cart = CartStore::restore(MemoryStorage::new());
//! let lamp = Product::new("lamp", "Desk Lamp", Price::from_cents(1000, CurrencyCode::USD));
//!
//! cart.add_item(&lamp);
//! cart.add_item(&lamp);
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().display(), "$20.00");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod line;
mod snapshot;
pub mod storage;
mod store;

pub use line::CartLine;
pub use snapshot::{CartSnapshot, SNAPSHOT_VERSION, SnapshotError};
pub use storage::{CartStorage, FileStorage, MemoryStorage, NoopStorage, StorageError};
pub use store::{CART_STORAGE_KEY, CartStore, CartSummary};
