//! Error types surfaced by the cart engine.

use thiserror::Error;

/// Errors that can occur during cart operations.
///
/// Oracle and transport failures are translated into these variants at the
/// coordinator boundary; raw transport errors never reach callers.
/// A clamped quantity is *not* an error; see
/// [`ValidationOutcome::Clamped`](crate::store::ValidationOutcome).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// The oracle cannot resolve the product; the line has been removed.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The oracle reports zero stock; the line has been removed.
    #[error("stock exhausted: {0}")]
    StockExhausted(String),

    /// Transient oracle/transport failure; the prior quantity has been
    /// restored and the caller may retry.
    #[error("validation unavailable: {0}")]
    ValidationUnavailable(String),

    /// Programming error at a non-clamping entry point, rejected rather
    /// than silently corrected.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The cart store task has shut down.
    #[error("cart store closed")]
    StoreClosed,
}
