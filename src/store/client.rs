//! Typed client for the cart store actor.
//!
//! The client hides the raw message passing behind async methods; closed
//! channels map to [`CartError::StoreClosed`].

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use super::actor::{CartRequest, CartView};
use super::outcomes::{AddOutcome, ValidationOutcome, ValidationTicket};
use crate::error::CartError;
use crate::model::{CartLine, Product, StockQuote};
use crate::oracle::OracleError;
use crate::pricing::Totals;

/// Cheap-to-clone handle to the cart store.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
    view_rx: watch::Receiver<CartView>,
}

impl CartClient {
    pub(super) fn new(sender: mpsc::Sender<CartRequest>, view_rx: watch::Receiver<CartView>) -> Self {
        Self { sender, view_rx }
    }

    /// Subscription channel for re-render: yields a [`CartView`] after
    /// every state change.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.view_rx.clone()
    }

    /// Adds one unit of `product`, inserting a new line on first add.
    pub async fn add_item(&self, product: Product) -> Result<AddOutcome, CartError> {
        debug!(product_id = %product.id, "add_item");
        self.request(|respond_to| CartRequest::AddItem { product, respond_to })
            .await
    }

    /// Sets a line's quantity; `0` removes the line. The quantity is
    /// clamped to the last-known stock.
    ///
    /// User-driven quantity changes should go through
    /// [`ValidationCoordinator::validate_quantity`](crate::coordinator::ValidationCoordinator::validate_quantity)
    /// instead so the oracle gets consulted.
    pub async fn set_quantity(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<Option<CartLine>, CartError> {
        let product_id = product_id.to_string();
        self.request(|respond_to| CartRequest::SetQuantity { product_id, quantity, respond_to })
            .await
    }

    /// Removes a line; no-op if the product is not in the cart.
    pub async fn remove_item(&self, product_id: &str) -> Result<(), CartError> {
        let product_id = product_id.to_string();
        self.request(|respond_to| CartRequest::RemoveItem { product_id, respond_to })
            .await
    }

    /// Empties the cart unconditionally.
    pub async fn clear(&self) -> Result<(), CartError> {
        self.request(|respond_to| CartRequest::Clear { respond_to }).await
    }

    /// Snapshot copy of the lines, in insertion order.
    pub async fn lines(&self) -> Result<Vec<CartLine>, CartError> {
        self.request(|respond_to| CartRequest::Lines { respond_to }).await
    }

    /// Current derived totals.
    pub async fn totals(&self) -> Result<Totals, CartError> {
        self.request(|respond_to| CartRequest::Totals { respond_to }).await
    }

    /// Current subtotal in minor currency units.
    pub async fn subtotal(&self) -> Result<u64, CartError> {
        Ok(self.totals().await?.subtotal)
    }

    /// Total number of units across all lines.
    pub async fn item_count(&self) -> Result<u32, CartError> {
        self.request(|respond_to| CartRequest::ItemCount { respond_to }).await
    }

    /// Opens a validation window: applies the quantity optimistically and
    /// returns the ticket to reconcile against.
    pub async fn begin_validation(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<ValidationTicket, CartError> {
        let product_id = product_id.to_string();
        self.request(|respond_to| CartRequest::BeginValidation { product_id, quantity, respond_to })
            .await
    }

    /// Delivers an oracle verdict for a ticket. Stale tickets resolve to
    /// [`ValidationOutcome::Superseded`] without touching the cart.
    pub async fn reconcile(
        &self,
        product_id: &str,
        seq: u64,
        verdict: Result<StockQuote, OracleError>,
    ) -> Result<ValidationOutcome, CartError> {
        let product_id = product_id.to_string();
        self.request(|respond_to| CartRequest::Reconcile { product_id, seq, verdict, respond_to })
            .await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, CartError>>) -> CartRequest,
    ) -> Result<T, CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| CartError::StoreClosed)?;
        response.await.map_err(|_| CartError::StoreClosed)?
    }
}
