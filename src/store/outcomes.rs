//! Reply types for cart operations beyond plain lines.
//!
//! These are the cart's equivalent of domain-specific action results:
//! they tell the presentation layer not just the resulting line but what
//! kind of adjustment, if any, the operation made.

use crate::model::CartLine;

/// Result of an `add_item` request.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// First add of this product; a new line with quantity 1.
    Added(CartLine),
    /// The product was already in the cart; quantity incremented.
    Incremented(CartLine),
    /// The line was already at its known stock limit; nothing changed.
    /// Surfaced so the UI can tell the user instead of staying silent.
    AtStockLimit(CartLine),
}

impl AddOutcome {
    /// The resulting line, whatever the outcome.
    pub fn line(&self) -> &CartLine {
        match self {
            AddOutcome::Added(line)
            | AddOutcome::Incremented(line)
            | AddOutcome::AtStockLimit(line) => line,
        }
    }
}

/// Receipt for an optimistic quantity change awaiting reconciliation.
///
/// The sequence number is monotonically increasing; a reconciliation is
/// applied only if its ticket still carries the highest sequence issued
/// for that product (last-request-wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationTicket {
    pub seq: u64,
    /// Quantity before the optimistic change, restored if the oracle is
    /// unreachable.
    pub prior_quantity: u32,
}

/// How a validation round-trip resolved.
///
/// Hard failures (`ProductNotFound`, `StockExhausted`,
/// `ValidationUnavailable`) are reported as [`CartError`](crate::error::CartError)
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The oracle confirmed the requested quantity; price and stock were
    /// refreshed on the line.
    Validated(CartLine),
    /// Authoritative stock is below the request; the quantity was clamped
    /// down. A partial success, not an error.
    Clamped {
        line: CartLine,
        requested: u32,
        available: u32,
    },
    /// The line was removed because quantity 0 was requested.
    Removed,
    /// A newer request for the same product superseded this one; nothing
    /// was applied.
    Superseded,
}
