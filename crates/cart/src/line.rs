//! Cart line items.

use dropship_core::{Price, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product's entry in the cart.
///
/// Lines are only created and changed by [`crate::CartStore`], which keeps
/// `quantity >= 1` for every stored line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    pub(crate) const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product snapshot taken when the line was created.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.product.price
    }

    /// `unit_price × quantity`, capped at the largest decimal amount.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.saturating_times(self.quantity)
    }

    pub(crate) const fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

/// Σ line totals, or `None` if any line total or the sum overflows.
pub(crate) fn checked_total(lines: &[CartLine]) -> Option<Decimal> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        let line_total = line.unit_price().checked_times(line.quantity())?;
        total.checked_add(line_total.amount)
    })
}
