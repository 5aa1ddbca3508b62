//! JSON-file-backed snapshot store.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{SnapshotError, SnapshotStore};
use crate::model::CartLine;

/// Persists the cart as a single JSON array on disk.
///
/// Each save rewrites the whole file; there is no incremental patching.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn save(&self, lines: Vec<CartLine>) -> Result<(), SnapshotError> {
        let encoded = serde_json::to_vec_pretty(&lines)?;
        tokio::fs::write(&self.path, encoded).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Vec<CartLine>, SnapshotError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            // No snapshot yet: a fresh cart, not an error.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;

    #[tokio::test]
    async fn round_trips_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cart.json"));

        let mut first = CartLine::from_product(Product::new("p1", "Milk", "500 ml", 60, 10), 2);
        first.is_updating = true; // must not survive the round trip
        let second = CartLine::from_product(Product::new("p2", "Rice", "kg", 90, 4), 1);

        store.save(vec![first.clone(), second.clone()]).await.unwrap();
        let restored = store.load().await.unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].product_id, "p1");
        assert_eq!(restored[1].product_id, "p2");
        assert!(!restored[0].is_updating);
        assert_eq!(restored[0].quantity, 2);
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = JsonFileStore::new(path);
        assert!(matches!(
            store.load().await,
            Err(SnapshotError::Encoding(_))
        ));
    }
}
