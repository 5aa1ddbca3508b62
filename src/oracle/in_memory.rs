//! A timed in-memory oracle backed by a mutable catalog.
//!
//! Stands in for the real stock service: every lookup resolves after a
//! fixed artificial latency, and tests can move prices and stock between
//! lookups to force the cart's cached copies stale. Per-product outages
//! can be injected to exercise the `ValidationUnavailable` path.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{OracleError, StockOracle};
use crate::model::StockQuote;

/// Mutable in-memory catalog with artificial lookup latency.
pub struct InMemoryOracle {
    catalog: Mutex<HashMap<String, StockQuote>>,
    unavailable: Mutex<HashSet<String>>,
    latency: Duration,
}

impl InMemoryOracle {
    /// Creates an empty catalog with no artificial latency.
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Creates an empty catalog whose lookups resolve after `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            catalog: Mutex::new(HashMap::new()),
            unavailable: Mutex::new(HashSet::new()),
            latency,
        }
    }

    /// Inserts or replaces a product's quote.
    pub fn insert(&self, product_id: impl Into<String>, price: u64, stock: u32) {
        self.catalog
            .lock()
            .unwrap()
            .insert(product_id.into(), StockQuote { price, stock });
    }

    /// Adjusts the authoritative stock level for a product.
    pub fn set_stock(&self, product_id: &str, stock: u32) {
        if let Some(quote) = self.catalog.lock().unwrap().get_mut(product_id) {
            quote.stock = stock;
        }
    }

    /// Adjusts the authoritative price for a product.
    pub fn set_price(&self, product_id: &str, price: u64) {
        if let Some(quote) = self.catalog.lock().unwrap().get_mut(product_id) {
            quote.price = price;
        }
    }

    /// Removes a product from the catalog entirely; subsequent lookups
    /// return [`OracleError::NotFound`].
    pub fn remove(&self, product_id: &str) {
        self.catalog.lock().unwrap().remove(product_id);
    }

    /// Marks a product's lookups as failing with
    /// [`OracleError::Unavailable`] until cleared.
    pub fn set_unavailable(&self, product_id: &str, unavailable: bool) {
        let mut down = self.unavailable.lock().unwrap();
        if unavailable {
            down.insert(product_id.to_string());
        } else {
            down.remove(product_id);
        }
    }
}

impl Default for InMemoryOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StockOracle for InMemoryOracle {
    async fn get_product(&self, product_id: &str) -> Result<StockQuote, OracleError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.unavailable.lock().unwrap().contains(product_id) {
            debug!(product_id, "oracle lookup failed (injected outage)");
            return Err(OracleError::Unavailable("injected outage".into()));
        }

        let quote = self
            .catalog
            .lock()
            .unwrap()
            .get(product_id)
            .copied()
            .ok_or_else(|| OracleError::NotFound(product_id.to_string()))?;
        debug!(product_id, price = quote.price, stock = quote.stock, "oracle lookup");
        Ok(quote)
    }
}
