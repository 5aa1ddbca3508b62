//! Pure pricing arithmetic: subtotal, delivery charge, grand total.
//!
//! Totals are always recomputed from the lines, never stored. All amounts
//! are integer minor currency units so summation order cannot drift.

use crate::model::CartLine;

/// Derived cart aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: u64,
    pub delivery_charge: u64,
    pub total: u64,
}

/// Delivery pricing thresholds, in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Subtotals at or above this ship free.
    pub free_delivery_threshold: u64,
    /// Flat fee charged below the threshold.
    pub flat_delivery_fee: u64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_delivery_threshold: 2000,
            flat_delivery_fee: 150,
        }
    }
}

impl PricingPolicy {
    /// Computes the derived aggregates for a set of lines.
    ///
    /// Pure and order-independent: permuting `lines` yields the same
    /// result.
    pub fn totals(&self, lines: &[CartLine]) -> Totals {
        let subtotal: u64 = lines.iter().map(CartLine::line_total).sum();
        let delivery_charge = if subtotal >= self.free_delivery_threshold {
            0
        } else {
            self.flat_delivery_fee
        };
        Totals {
            subtotal,
            delivery_charge,
            total: subtotal + delivery_charge,
        }
    }
}

/// Total number of units across all lines.
pub fn item_count(lines: &[CartLine]) -> u32 {
    lines.iter().map(|line| line.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;

    fn line(id: &str, price: u64, quantity: u32) -> CartLine {
        CartLine::from_product(Product::new(id, id, "pc", price, 100), quantity)
    }

    #[test]
    fn free_delivery_boundary() {
        let policy = PricingPolicy::default();

        // Exactly at the threshold: free.
        let at = policy.totals(&[line("p1", 1000, 2)]);
        assert_eq!(at.subtotal, 2000);
        assert_eq!(at.delivery_charge, 0);
        assert_eq!(at.total, 2000);

        // One unit below: flat fee applies.
        let below = policy.totals(&[line("p1", 1999, 1)]);
        assert_eq!(below.subtotal, 1999);
        assert_eq!(below.delivery_charge, 150);
        assert_eq!(below.total, 2149);
    }

    #[test]
    fn totals_are_order_independent() {
        let policy = PricingPolicy::default();
        let a = line("p1", 500, 3);
        let b = line("p2", 120, 7);
        let c = line("p3", 75, 1);

        let forward = policy.totals(&[a.clone(), b.clone(), c.clone()]);
        let reversed = policy.totals(&[c, b, a]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn empty_cart_still_carries_the_flat_fee() {
        let totals = PricingPolicy::default().totals(&[]);
        assert_eq!(totals.subtotal, 0);
        assert_eq!(totals.delivery_charge, 150);
        assert_eq!(totals.total, 150);
    }

    #[test]
    fn item_count_sums_quantities() {
        assert_eq!(item_count(&[line("p1", 10, 2), line("p2", 10, 5)]), 7);
        assert_eq!(item_count(&[]), 0);
    }
}
