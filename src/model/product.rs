use serde::{Deserialize, Serialize};

/// Catalog payload handed to the cart at add-to-cart time.
///
/// This is an explicit DTO with exactly the fields the cart copies onto a
/// line. Catalog payloads carrying extra fields are rejected at the
/// deserialization boundary rather than propagated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Display unit, e.g. "kg" or "500 ml".
    pub unit: String,
    /// Unit price in minor currency units.
    pub price: u64,
    /// Available quantity at the time the catalog was read. May already be
    /// stale by the time the user adds the product.
    pub stock: u32,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        price: u64,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            price,
            stock,
        }
    }
}

/// Authoritative `{price, stock}` pair returned by the stock oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockQuote {
    pub price: u64,
    pub stock: u32,
}
