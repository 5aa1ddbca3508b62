//! The validation coordinator: reconciles optimistic quantity changes
//! against the oracle.
//!
//! The coordinator never blocks the cart: the optimistic change lands
//! synchronously in the store, the oracle round-trip happens out here,
//! and the verdict re-enters the store as a ticketed `Reconcile` message.
//! At most one round-trip per product is authoritative at a time; a newer
//! request supersedes the pending one and the stale verdict is discarded.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::CartError;
use crate::oracle::StockOracle;
use crate::store::CartClient;

pub use crate::store::{ValidationOutcome, ValidationTicket};

/// Orchestrates optimistic quantity changes and their reconciliation.
#[derive(Clone)]
pub struct ValidationCoordinator {
    cart: CartClient,
    oracle: Arc<dyn StockOracle>,
}

impl ValidationCoordinator {
    pub fn new(cart: CartClient, oracle: Arc<dyn StockOracle>) -> Self {
        Self { cart, oracle }
    }

    /// Applies a user-driven quantity change with oracle validation.
    ///
    /// The change is visible in the cart immediately; the returned
    /// outcome describes how the oracle's authoritative `{price, stock}`
    /// was reconciled into it:
    ///
    /// - `Ok(Validated)`: quantity confirmed, price/stock refreshed.
    /// - `Ok(Clamped { .. })`: stock dropped below the request; the
    ///   quantity was reduced. Partial success, worth a notification.
    /// - `Ok(Removed)`: `quantity` was 0, the line is gone.
    /// - `Ok(Superseded)`: a newer call for the same product won; this
    ///   call's verdict was discarded.
    /// - `Err(ProductNotFound | StockExhausted)`: the line was removed.
    /// - `Err(ValidationUnavailable)`: the oracle was unreachable; the
    ///   prior quantity was restored and the caller may retry.
    #[instrument(skip(self))]
    pub async fn validate_quantity(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<ValidationOutcome, CartError> {
        if quantity == 0 {
            self.cart.remove_item(product_id).await?;
            return Ok(ValidationOutcome::Removed);
        }

        let ticket = self.cart.begin_validation(product_id, quantity).await?;
        debug!(seq = ticket.seq, "Validation ticket issued");

        // The only suspension point: oracle latency bounds the window in
        // which the cart may transiently hold quantity > authoritative
        // stock.
        let verdict = self.oracle.get_product(product_id).await;

        self.cart.reconcile(product_id, ticket.seq, verdict).await
    }
}
