//! Cart snapshot persistence.
//!
//! Persistence is an injected capability, never tied to a concrete
//! storage medium: the store calls [`SnapshotStore::save`] fire-and-forget
//! after every mutation, and the lifecycle calls [`SnapshotStore::load`]
//! once at startup. Save failures are logged and never surfaced to the
//! user; an unreadable snapshot loads as an empty cart at the lifecycle
//! boundary.
//!
//! Snapshots are whole-state replacements, not incremental patches, so a
//! crash between mutation and save loses at most the last mutation.

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::CartLine;

/// Failures while reading or writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("snapshot store error: {0}")]
    Store(String),
}

/// Durable local storage for the cart's line snapshot.
///
/// The snapshot format is an ordered list of line records; `is_updating`
/// never enters a snapshot. No schema versioning in the base design.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Replaces the stored snapshot wholesale.
    async fn save(&self, lines: Vec<CartLine>) -> Result<(), SnapshotError>;

    /// Loads the last snapshot; an empty list when none exists.
    async fn load(&self) -> Result<Vec<CartLine>, SnapshotError>;
}
