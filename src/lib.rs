//! # Cart Engine
//!
//! The shopping-cart consistency engine for the grocery storefront: it
//! keeps a client-held cart (item, quantity, price, stock) synchronized
//! with an authoritative but asynchronous stock/price source, while the
//! UI gets immediate optimistic feedback.
//!
//! ## Design
//!
//! The cart is an **actor**: a tokio task with exclusive ownership of the
//! lines, processing requests sequentially over a channel. No locks guard
//! the cart state, and the only suspension point in the engine (the
//! oracle round-trip) happens outside the task, re-entering it as a
//! sequence-numbered `Reconcile` message. That sequence number is what
//! makes reconciliation safe under racing user input: a response is
//! applied only if it belongs to the newest request for its product
//! (last-request-wins), so a slow oracle reply can never clobber a more
//! recent action.
//!
//! ## Module tour
//!
//! - [`model`]: Pure DTOs. [`Product`](model::Product) payloads,
//!   [`CartLine`](model::CartLine)s, oracle [`StockQuote`](model::StockQuote)s.
//! - [`pricing`]: The pure totals arithmetic. Subtotal, free-delivery
//!   threshold, flat fee. Integer minor units throughout.
//! - [`store`]: The cart store actor and its typed
//!   [`CartClient`](store::CartClient); a `watch` channel broadcasts a
//!   fresh [`CartView`](store::CartView) on every mutation.
//! - [`coordinator`]: The validation coordinator. Optimistic apply,
//!   oracle query, ticketed reconcile.
//! - [`oracle`]: The [`StockOracle`](oracle::StockOracle) seam plus a
//!   timed in-memory mock and a scripted test oracle.
//! - [`persistence`]: The [`SnapshotStore`](persistence::SnapshotStore)
//!   seam plus JSON-file and in-memory implementations. Saves are
//!   fire-and-forget; failures are logged, never surfaced.
//! - [`lifecycle`]: [`CartSystem`](lifecycle::CartSystem) start/shutdown
//!   and tracing setup. No ambient globals: every system is an owned
//!   instance, so tests run isolated carts.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use cart_engine::lifecycle::CartSystem;
//! use cart_engine::model::Product;
//! use cart_engine::oracle::InMemoryOracle;
//! use cart_engine::persistence::JsonFileStore;
//!
//! let oracle = Arc::new(InMemoryOracle::new());
//! oracle.insert("p1", 500, 3);
//!
//! let system = CartSystem::start(
//!     oracle.clone(),
//!     Arc::new(JsonFileStore::new("cart.json")),
//! ).await;
//!
//! system.cart.add_item(Product::new("p1", "Milk", "500 ml", 500, 3)).await?;
//! let outcome = system.coordinator.validate_quantity("p1", 3).await?;
//! system.shutdown().await?;
//! ```

pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod oracle;
pub mod persistence;
pub mod pricing;
pub mod store;

pub use error::CartError;
