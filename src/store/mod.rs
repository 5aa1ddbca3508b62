//! The cart store: an actor owning the ordered cart lines, plus its
//! typed client.

pub mod actor;
pub mod client;
mod outcomes;

pub use actor::{CartRequest, CartStore, CartView, Response};
pub use client::CartClient;
pub use outcomes::{AddOutcome, ValidationOutcome, ValidationTicket};

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::model::CartLine;
use crate::persistence::SnapshotStore;
use crate::pricing::PricingPolicy;

/// Creates a cart store actor and its client.
///
/// `initial` is the rehydrated snapshot; invariants are re-established on
/// it before the first view is published.
pub fn new(
    pricing: PricingPolicy,
    persistence: Arc<dyn SnapshotStore>,
    initial: Vec<CartLine>,
) -> (CartStore, CartClient) {
    let (sender, receiver) = mpsc::channel(32);
    let (view_tx, view_rx) = watch::channel(CartView::default());
    let store = CartStore::new(receiver, pricing, persistence, initial, view_tx);
    let client = CartClient::new(sender, view_rx);
    (store, client)
}
