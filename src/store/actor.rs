//! The cart store actor: single owner of the cart's state.
//!
//! All mutation flows through the message loop, so the lines need no
//! locking: requests are processed sequentially, and the only suspension
//! point in the whole engine (the oracle round-trip) happens *outside*
//! this task, re-entering it as a `Reconcile` message guarded by a
//! sequence number.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::outcomes::{AddOutcome, ValidationOutcome, ValidationTicket};
use crate::error::CartError;
use crate::model::{CartLine, Product, StockQuote};
use crate::oracle::OracleError;
use crate::persistence::SnapshotStore;
use crate::pricing::{item_count, PricingPolicy, Totals};

/// One-shot reply channel used by every cart request.
pub type Response<T> = oneshot::Sender<Result<T, CartError>>;

/// Snapshot of the cart handed to subscribers on every state change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    pub item_count: u32,
}

/// Requests understood by the cart store actor.
#[derive(Debug)]
pub enum CartRequest {
    AddItem {
        product: Product,
        respond_to: Response<AddOutcome>,
    },
    SetQuantity {
        product_id: String,
        quantity: u32,
        respond_to: Response<Option<CartLine>>,
    },
    RemoveItem {
        product_id: String,
        respond_to: Response<()>,
    },
    Clear {
        respond_to: Response<()>,
    },
    Lines {
        respond_to: Response<Vec<CartLine>>,
    },
    Totals {
        respond_to: Response<Totals>,
    },
    ItemCount {
        respond_to: Response<u32>,
    },
    /// Optimistically applies a quantity change and opens a validation
    /// window for the product.
    BeginValidation {
        product_id: String,
        quantity: u32,
        respond_to: Response<ValidationTicket>,
    },
    /// Applies an oracle verdict, but only if `seq` is still the latest
    /// issued for the product.
    Reconcile {
        product_id: String,
        seq: u64,
        verdict: Result<StockQuote, OracleError>,
        respond_to: Response<ValidationOutcome>,
    },
}

/// An optimistic change awaiting its oracle verdict.
struct PendingValidation {
    seq: u64,
    prior_quantity: u32,
    requested: u32,
}

/// The actor half: owns the lines and processes requests sequentially.
pub struct CartStore {
    receiver: mpsc::Receiver<CartRequest>,
    lines: Vec<CartLine>,
    pricing: PricingPolicy,
    persistence: Arc<dyn SnapshotStore>,
    view_tx: watch::Sender<CartView>,
    /// Latest open validation per product. Any direct mutation of a
    /// product drops its entry, superseding the in-flight round-trip.
    pending: HashMap<String, PendingValidation>,
    next_seq: u64,
    /// Feed into the persister task; `None` until `run` starts.
    snapshot_tx: Option<mpsc::UnboundedSender<Vec<CartLine>>>,
}

impl CartStore {
    pub(super) fn new(
        receiver: mpsc::Receiver<CartRequest>,
        pricing: PricingPolicy,
        persistence: Arc<dyn SnapshotStore>,
        initial: Vec<CartLine>,
        view_tx: watch::Sender<CartView>,
    ) -> Self {
        let lines = sanitize(initial);
        let store = Self {
            receiver,
            lines,
            pricing,
            persistence,
            view_tx,
            pending: HashMap::new(),
            next_seq: 0,
            snapshot_tx: None,
        };
        // Seed subscribers with the rehydrated state.
        let _ = store.view_tx.send(store.view());
        store
    }

    /// Runs the store's event loop until all clients are dropped.
    ///
    /// Saves are queued to a dedicated persister task so whole-snapshot
    /// writes land in mutation order; the queue is drained before `run`
    /// returns, so a graceful shutdown never loses the final state.
    pub async fn run(mut self) {
        info!(lines = self.lines.len(), "Cart store started");

        let (snapshot_tx, mut snapshot_rx) = mpsc::unbounded_channel::<Vec<CartLine>>();
        let persistence = Arc::clone(&self.persistence);
        let persister = tokio::spawn(async move {
            while let Some(snapshot) = snapshot_rx.recv().await {
                if let Err(e) = persistence.save(snapshot).await {
                    // Best effort only: never surfaced, never blocks the cart.
                    warn!(error = %e, "Snapshot save failed");
                }
            }
        });
        self.snapshot_tx = Some(snapshot_tx);

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddItem { product, respond_to } => {
                    let _ = respond_to.send(self.add_item(product));
                }
                CartRequest::SetQuantity { product_id, quantity, respond_to } => {
                    let _ = respond_to.send(self.set_quantity(&product_id, quantity));
                }
                CartRequest::RemoveItem { product_id, respond_to } => {
                    if self.remove_line(&product_id) {
                        info!(product_id, "Removed");
                        self.publish();
                    } else {
                        debug!(product_id, "Remove: not in cart");
                    }
                    let _ = respond_to.send(Ok(()));
                }
                CartRequest::Clear { respond_to } => {
                    info!(lines = self.lines.len(), "Cleared");
                    self.lines.clear();
                    self.pending.clear();
                    self.publish();
                    let _ = respond_to.send(Ok(()));
                }
                CartRequest::Lines { respond_to } => {
                    let _ = respond_to.send(Ok(self.lines.clone()));
                }
                CartRequest::Totals { respond_to } => {
                    let _ = respond_to.send(Ok(self.pricing.totals(&self.lines)));
                }
                CartRequest::ItemCount { respond_to } => {
                    let _ = respond_to.send(Ok(item_count(&self.lines)));
                }
                CartRequest::BeginValidation { product_id, quantity, respond_to } => {
                    let _ = respond_to.send(self.begin_validation(&product_id, quantity));
                }
                CartRequest::Reconcile { product_id, seq, verdict, respond_to } => {
                    let _ = respond_to.send(self.reconcile(&product_id, seq, verdict));
                }
            }
        }

        // Close the feed and let the persister flush what's queued.
        self.snapshot_tx.take();
        let _ = persister.await;

        info!(lines = self.lines.len(), "Cart store shutdown");
    }

    fn add_item(&mut self, product: Product) -> Result<AddOutcome, CartError> {
        if product.id.is_empty() {
            return Err(CartError::InvalidOperation("empty product id".into()));
        }
        if product.stock == 0 {
            return Err(CartError::InvalidOperation(format!(
                "product out of stock: {}",
                product.id
            )));
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            if line.quantity >= line.stock {
                debug!(product_id = %product.id, stock = line.stock, "Add: at stock limit");
                return Ok(AddOutcome::AtStockLimit(line.clone()));
            }
            line.quantity += 1;
            let snapshot = line.clone();
            self.pending.remove(&product.id);
            info!(product_id = %product.id, quantity = snapshot.quantity, "Incremented");
            self.publish();
            Ok(AddOutcome::Incremented(snapshot))
        } else {
            let line = CartLine::from_product(product, 1);
            info!(product_id = %line.product_id, "Added");
            self.lines.push(line.clone());
            self.publish();
            Ok(AddOutcome::Added(line))
        }
    }

    fn set_quantity(
        &mut self,
        product_id: &str,
        quantity: u32,
    ) -> Result<Option<CartLine>, CartError> {
        if quantity == 0 {
            if self.remove_line(product_id) {
                info!(product_id, "Removed (quantity 0)");
                self.publish();
            }
            return Ok(None);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CartError::ProductNotFound(product_id.to_string()))?;

        let clamped = quantity.min(line.stock);
        line.quantity = clamped;
        let snapshot = line.clone();
        self.pending.remove(product_id);
        info!(product_id, quantity = clamped, requested = quantity, "Quantity set");
        self.publish();
        Ok(Some(snapshot))
    }

    fn begin_validation(
        &mut self,
        product_id: &str,
        quantity: u32,
    ) -> Result<ValidationTicket, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidOperation(
                "validation of quantity 0; use remove".into(),
            ));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| {
                CartError::InvalidOperation(format!("product not in cart: {product_id}"))
            })?;

        let prior_quantity = line.quantity;
        // Optimistic application, clamped against the last-known stock.
        // Reconciliation re-derives the final quantity from the requested
        // value and the authoritative stock.
        line.quantity = quantity.min(line.stock);
        line.is_updating = true;

        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending.insert(
            product_id.to_string(),
            PendingValidation {
                seq,
                prior_quantity,
                requested: quantity,
            },
        );
        debug!(product_id, seq, requested = quantity, prior_quantity, "Validation opened");
        self.publish();
        Ok(ValidationTicket { seq, prior_quantity })
    }

    fn reconcile(
        &mut self,
        product_id: &str,
        seq: u64,
        verdict: Result<StockQuote, OracleError>,
    ) -> Result<ValidationOutcome, CartError> {
        match self.pending.get(product_id) {
            Some(pending) if pending.seq == seq => {}
            _ => {
                // Stale response for a superseded request, or the line was
                // mutated directly in the meantime. Discard silently.
                debug!(product_id, seq, "Reconcile superseded");
                return Ok(ValidationOutcome::Superseded);
            }
        }
        let pending = match self.pending.remove(product_id) {
            Some(pending) => pending,
            None => return Ok(ValidationOutcome::Superseded),
        };

        let index = match self.lines.iter().position(|l| l.product_id == product_id) {
            Some(index) => index,
            None => return Ok(ValidationOutcome::Superseded),
        };

        match verdict {
            Err(OracleError::Unavailable(reason)) => {
                let line = &mut self.lines[index];
                line.quantity = pending.prior_quantity;
                line.is_updating = false;
                warn!(product_id, seq, %reason, restored = pending.prior_quantity, "Validation unavailable, reverted");
                self.publish();
                Err(CartError::ValidationUnavailable(reason))
            }
            Err(OracleError::NotFound(_)) => {
                self.lines.remove(index);
                warn!(product_id, seq, "Product gone from catalog, line removed");
                self.publish();
                Err(CartError::ProductNotFound(product_id.to_string()))
            }
            Ok(quote) if quote.stock == 0 => {
                self.lines.remove(index);
                warn!(product_id, seq, "Stock exhausted, line removed");
                self.publish();
                Err(CartError::StockExhausted(product_id.to_string()))
            }
            Ok(quote) => {
                let line = &mut self.lines[index];
                line.price = quote.price;
                line.stock = quote.stock;
                line.is_updating = false;

                if pending.requested > quote.stock {
                    line.quantity = quote.stock;
                    let snapshot = line.clone();
                    info!(
                        product_id,
                        seq,
                        requested = pending.requested,
                        available = quote.stock,
                        "Quantity clamped"
                    );
                    self.publish();
                    Ok(ValidationOutcome::Clamped {
                        line: snapshot,
                        requested: pending.requested,
                        available: quote.stock,
                    })
                } else {
                    line.quantity = pending.requested;
                    let snapshot = line.clone();
                    info!(product_id, seq, quantity = pending.requested, "Validated");
                    self.publish();
                    Ok(ValidationOutcome::Validated(snapshot))
                }
            }
        }
    }

    /// Removes a line and its pending validation. Returns whether a line
    /// was actually removed.
    fn remove_line(&mut self, product_id: &str) -> bool {
        self.pending.remove(product_id);
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    fn view(&self) -> CartView {
        CartView {
            lines: self.lines.clone(),
            totals: self.pricing.totals(&self.lines),
            item_count: item_count(&self.lines),
        }
    }

    /// Broadcasts the new view and queues a best-effort snapshot save.
    fn publish(&self) {
        let _ = self.view_tx.send(self.view());
        if let Some(tx) = &self.snapshot_tx {
            let _ = tx.send(self.lines.clone());
        }
    }
}

/// Re-establishes the cart invariants on rehydrated lines: unique product
/// ids, quantity within `[1, stock]`, no in-flight markers.
fn sanitize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut seen = std::collections::HashSet::new();
    let mut clean = Vec::with_capacity(lines.len());
    for mut line in lines {
        if line.quantity == 0 || line.stock == 0 || line.product_id.is_empty() {
            continue;
        }
        if !seen.insert(line.product_id.clone()) {
            continue;
        }
        line.quantity = line.quantity.min(line.stock);
        line.is_updating = false;
        clean.push(line);
    }
    clean
}

#[cfg(test)]
mod tests {
    use super::sanitize;
    use crate::model::{CartLine, Product};

    fn line(id: &str, quantity: u32, stock: u32) -> CartLine {
        CartLine::from_product(Product::new(id, id, "pc", 100, stock), quantity)
    }

    #[test]
    fn sanitize_drops_duplicates_and_zeroes() {
        let mut updating = line("p3", 2, 5);
        updating.is_updating = true;

        let clean = sanitize(vec![
            line("p1", 3, 2),  // over stock: clamped
            line("p1", 1, 2),  // duplicate: dropped
            line("p2", 0, 5),  // zero quantity: dropped
            line("", 1, 5),    // empty id: dropped
            line("p4", 1, 0),  // zero stock: dropped
            updating,          // in-flight marker reset
        ]);

        assert_eq!(clean.len(), 2);
        assert_eq!(clean[0].product_id, "p1");
        assert_eq!(clean[0].quantity, 2);
        assert_eq!(clean[1].product_id, "p3");
        assert!(!clean[1].is_updating);
    }
}
