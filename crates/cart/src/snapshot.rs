//! Persisted cart layout.
//!
//! ```json
//! {"version": 1, "items": [{"product": {...}, "quantity": 2}]}
//! ```
//!
//! Only line items are stored. Totals are always recomputed after a restore.

use dropship_core::{Price, PriceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::line::{CartLine, checked_total};

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors decoding a stored snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid cart snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported cart snapshot version {found}")]
    UnsupportedVersion { found: u32 },

    #[error("cart snapshot line {product_id} has an invalid price: {source}")]
    InvalidPrice {
        product_id: String,
        source: PriceError,
    },

    #[error("cart snapshot total does not fit in a decimal amount")]
    TotalOverflow,
}

/// Serialized form of a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub version: u32,
    pub items: Vec<CartLine>,
}

#[derive(Serialize)]
struct CartSnapshotRef<'a> {
    version: u32,
    items: &'a [CartLine],
}

impl CartSnapshot {
    /// Encode lines as a current-version snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a product's variant data cannot be serialized.
    pub fn encode(items: &[CartLine]) -> Result<String, SnapshotError> {
        let snapshot = CartSnapshotRef {
            version: SNAPSHOT_VERSION,
            items,
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Decode a snapshot and normalize its lines.
    ///
    /// Lines with quantity 0 are dropped and repeated product IDs are merged
    /// into the first occurrence, so the result satisfies the cart
    /// invariants even if the stored data was edited by hand.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, an unknown schema version, a
    /// negative unit price, or totals that overflow.
    pub fn decode(raw: &str) -> Result<Vec<CartLine>, SnapshotError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
            });
        }

        let mut lines: Vec<CartLine> = Vec::with_capacity(snapshot.items.len());
        for line in snapshot.items {
            let price = line.unit_price();
            if let Err(source) = Price::try_new(price.amount, price.currency_code) {
                return Err(SnapshotError::InvalidPrice {
                    product_id: line.product_id().to_string(),
                    source,
                });
            }
            if line.quantity() == 0 {
                continue;
            }
            match lines
                .iter_mut()
                .find(|existing| existing.product_id() == line.product_id())
            {
                Some(existing) => {
                    let merged = existing.quantity().saturating_add(line.quantity());
                    existing.set_quantity(merged);
                }
                None => lines.push(line),
            }
        }

        if checked_total(&lines).is_none() {
            return Err(SnapshotError::TotalOverflow);
        }
        Ok(lines)
    }
}
