//! The cart store.

use dropship_core::{CurrencyCode, Price, Product, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::line::{CartLine, checked_total};
use crate::snapshot::CartSnapshot;
use crate::storage::CartStorage;

/// Fixed key the cart snapshot is stored under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Derived totals, published to subscribers after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub line_count: usize,
    pub total_items: u64,
    pub total_price: Price,
}

/// Authoritative cart state for one browser profile.
///
/// Mutations are synchronous. Each one that changes the lines writes a new
/// snapshot to the storage backend and publishes a fresh [`CartSummary`].
/// Storage failures are logged and never surface to the caller.
///
/// All lines share the store's currency. A product priced in another
/// currency is ignored by [`CartStore::add_item`].
pub struct CartStore<S: CartStorage> {
    lines: Vec<CartLine>,
    currency: CurrencyCode,
    storage: S,
    summary: watch::Sender<CartSummary>,
}

impl<S: CartStorage> CartStore<S> {
    /// An empty USD cart over `storage`, ignoring anything already stored.
    pub fn new(storage: S) -> Self {
        Self::with_lines(storage, Vec::new(), CurrencyCode::default())
    }

    /// Restore a USD cart from `storage`.
    ///
    /// See [`CartStore::restore_in`].
    pub fn restore(storage: S) -> Self {
        Self::restore_in(storage, CurrencyCode::default())
    }

    /// Restore a cart priced in `currency` from `storage`.
    ///
    /// A missing key yields an empty cart. Unreadable storage or an invalid
    /// snapshot also yields an empty cart, with a warning. Restored lines in
    /// a different currency are dropped.
    pub fn restore_in(storage: S, currency: CurrencyCode) -> Self {
        let lines = match storage.load(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match CartSnapshot::decode(&raw) {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable cart snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Cart storage unavailable, starting with an empty cart");
                Vec::new()
            }
        };

        let before = lines.len();
        let lines: Vec<CartLine> = lines
            .into_iter()
            .filter(|line| line.unit_price().currency_code == currency)
            .collect();
        if lines.len() != before {
            warn!(
                dropped = before - lines.len(),
                currency = %currency,
                "Dropped restored cart lines priced in another currency"
            );
        }

        debug!(lines = lines.len(), "Cart restored");
        Self::with_lines(storage, lines, currency)
    }

    fn with_lines(storage: S, lines: Vec<CartLine>, currency: CurrencyCode) -> Self {
        let summary = summarize(&lines, currency);
        let (summary, _) = watch::channel(summary);
        Self {
            lines,
            currency,
            storage,
            summary,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the same product ID, or appends a new
    /// line with quantity 1. Returns `false` when the product was ignored,
    /// either because it is priced in a different currency or because the
    /// cart total would no longer fit in a decimal amount.
    pub fn add_item(&mut self, product: &Product) -> bool {
        if product.price.currency_code != self.currency {
            warn!(
                product_id = %product.id,
                product_currency = %product.price.currency_code,
                cart_currency = %self.currency,
                "Ignoring product priced in another currency"
            );
            return false;
        }

        let previous = self.line(&product.id).map(CartLine::quantity);
        match self.line_mut(&product.id) {
            Some(line) => {
                let quantity = line.quantity().saturating_add(1);
                line.set_quantity(quantity);
            }
            None => self.lines.push(CartLine::new(product.clone(), 1)),
        }

        if checked_total(&self.lines).is_none() {
            match previous {
                Some(quantity) => self.restore_quantity(&product.id, quantity),
                None => {
                    self.lines.pop();
                }
            }
            warn!(product_id = %product.id, "Ignoring add that would overflow the cart total");
            return false;
        }

        debug!(product_id = %product.id, "Added item to cart");
        self.commit();
        true
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id() != product_id);
        if self.lines.len() == before {
            return false;
        }

        debug!(product_id = %product_id, "Removed item from cart");
        self.commit();
        true
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` are clamped. Unknown IDs are ignored, as is a quantity
    /// whose cart total would not fit in a decimal amount. Returns whether
    /// the cart changed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };
        let previous = line.quantity();
        if previous == quantity {
            return false;
        }
        line.set_quantity(quantity);

        if checked_total(&self.lines).is_none() {
            self.restore_quantity(product_id, previous);
            warn!(
                product_id = %product_id,
                quantity,
                "Ignoring quantity that would overflow the cart total"
            );
            return false;
        }

        debug!(product_id = %product_id, quantity, "Updated cart quantity");
        self.commit();
        true
    }

    /// Empty the cart. The empty cart is always written back.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        debug!("Cleared cart");
        self.commit();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Σ quantity over all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        total_items(&self.lines)
    }

    /// Σ unit price × quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        total_price(&self.lines, self.currency)
    }

    /// Current totals.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        summarize(&self.lines, self.currency)
    }

    /// Watch the cart's totals. The receiver sees the state after every
    /// completed mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.summary.subscribe()
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and hand back its storage backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product_id)
    }

    fn restore_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if let Some(line) = self.line_mut(product_id) {
            line.set_quantity(quantity);
        }
    }

    /// Persist the lines and notify subscribers.
    fn commit(&mut self) {
        match CartSnapshot::encode(&self.lines) {
            Ok(raw) => {
                if let Err(e) = self.storage.save(CART_STORAGE_KEY, &raw) {
                    warn!(error = %e, "Failed to persist cart");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode cart snapshot"),
        }

        self.summary.send_replace(summarize(&self.lines, self.currency));
    }
}

impl<S: CartStorage> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

fn total_items(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity())).sum()
}

fn total_price(lines: &[CartLine], currency: CurrencyCode) -> Price {
    let amount = lines.iter().fold(Decimal::ZERO, |total, line| {
        total.saturating_add(line.line_total().amount)
    });
    Price::new(amount, currency)
}

fn summarize(lines: &[CartLine], currency: CurrencyCode) -> CartSummary {
    CartSummary {
        line_count: lines.len(),
        total_items: total_items(lines),
        total_price: total_price(lines, currency),
    }
}
