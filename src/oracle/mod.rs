//! The stock/price oracle: the authoritative source for current product
//! price and stock, queried asynchronously.
//!
//! The cart only ever talks to the [`StockOracle`] trait, so the mock
//! catalog used here can be swapped for a real backend without touching
//! the store or coordinator.

pub mod in_memory;
pub mod scripted;

pub use in_memory::InMemoryOracle;
pub use scripted::{scripted_oracle, OracleHandle, OracleRequest, ScriptedOracle};

use async_trait::async_trait;
use thiserror::Error;

use crate::model::StockQuote;

/// Failures an oracle lookup can produce.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OracleError {
    /// The oracle has no record of the product.
    #[error("unknown product: {0}")]
    NotFound(String),

    /// Transport-level failure; the lookup may be retried.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

/// Authoritative source for current `{price, stock}`.
#[async_trait]
pub trait StockOracle: Send + Sync {
    /// Returns the current quote for a product.
    ///
    /// May disagree with whatever the cart last cached for the same
    /// product; reconciliation resolves the difference.
    async fn get_product(&self, product_id: &str) -> Result<StockQuote, OracleError>;
}
