//! In-memory snapshot store for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{SnapshotError, SnapshotStore};
use crate::model::CartLine;

/// Snapshot store holding the last save in memory.
///
/// Saves can be made to fail on demand to verify that snapshot failures
/// never fail the mutation that triggered them.
#[derive(Default)]
pub struct InMemoryStore {
    snapshot: Mutex<Vec<CartLine>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an existing snapshot.
    pub fn with_snapshot(lines: Vec<CartLine>) -> Self {
        Self {
            snapshot: Mutex::new(lines),
            ..Self::default()
        }
    }

    /// Makes subsequent saves fail until cleared.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The last successfully saved snapshot.
    pub fn saved(&self) -> Vec<CartLine> {
        self.snapshot.lock().unwrap().clone()
    }

    /// Number of save attempts observed (including failed ones).
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn save(&self, lines: Vec<CartLine>) -> Result<(), SnapshotError> {
        self.save_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SnapshotError::Store("injected save failure".into()));
        }
        *self.snapshot.lock().unwrap() = lines;
        Ok(())
    }

    async fn load(&self) -> Result<Vec<CartLine>, SnapshotError> {
        Ok(self.snapshot.lock().unwrap().clone())
    }
}
