use serde::{Deserialize, Serialize};

use super::Product;

/// A single line in the cart.
///
/// `name`, `unit`, `price` and `stock` are copied from the catalog payload
/// at add time and may go stale; reconciliation refreshes `price` and
/// `stock` from the oracle. Invariant after reconciliation:
/// `1 <= quantity <= stock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit: String,
    /// Unit price in minor currency units.
    pub price: u64,
    /// Last-known available quantity.
    pub stock: u32,
    pub quantity: u32,
    /// True while a validation round-trip for this line is in flight.
    /// UI feedback only, never consulted for correctness; excluded from
    /// snapshots.
    #[serde(skip)]
    pub is_updating: bool,
}

impl CartLine {
    /// Creates a line from a catalog payload with the given quantity.
    pub fn from_product(product: Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name,
            unit: product.unit,
            price: product.price,
            stock: product.stock,
            quantity,
            is_updating: false,
        }
    }

    /// Line total in minor currency units.
    pub fn line_total(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}
