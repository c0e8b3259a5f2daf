// # Memory Status Store
//
// In-memory implementation of StatusStore.
//
// ## Purpose
//
// Keeps the snapshot inside the process. Useful for tests and for embedding
// the engine in a long-running host that schedules runs itself.
//
// ## Crash Behavior
//
// - All state is lost on restart
// - The first run after a restart treats every status as new

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::Error;
use crate::model::StatusSnapshot;
use crate::traits::status_store::StatusStore;

/// In-memory status store implementation
///
/// Clones share the same snapshot, so a test can keep one handle and give
/// another to the engine.
///
/// # Example
///
/// ```rust,no_run
/// use stockwatch_core::state::MemoryStatusStore;
/// use stockwatch_core::traits::StatusStore;
/// use stockwatch_core::StatusSnapshot;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStatusStore::new();
///
///     let snapshot = StatusSnapshot::new().with("bhs", "KS-A_24ska01", true);
///     store.save(&snapshot).await?;
///
///     assert_eq!(store.load().await, snapshot);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStatusStore {
    inner: Arc<RwLock<StatusSnapshot>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStatusStore {
    /// Create a new empty memory status store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a snapshot (as if a previous run saved it)
    pub fn with_snapshot(snapshot: StatusSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `save` was called
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn load(&self) -> StatusSnapshot {
        self.inner.read().await.clone()
    }

    async fn save(&self, snapshot: &StatusSnapshot) -> Result<(), Error> {
        *self.inner.write().await = snapshot.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStatusStore::new();

        // Initially empty
        assert!(store.load().await.is_empty());

        let snapshot = StatusSnapshot::new().with("bhs", "KS-A_24ska01", true);
        store.save(&snapshot).await.unwrap();

        assert_eq!(store.load().await, snapshot);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_save_replaces() {
        let store = MemoryStatusStore::with_snapshot(
            StatusSnapshot::new()
                .with("bhs", "KS-A_24ska01", true)
                .with("gra", "KS-A_24ska01", false),
        );

        let next = StatusSnapshot::new().with("bhs", "KS-A_24ska01", false);
        store.save(&next).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.get("gra", "KS-A_24ska01"), None);
        assert_eq!(loaded.get("bhs", "KS-A_24ska01"), Some(false));
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryStatusStore::new();
        let handle = store.clone();

        store
            .save(&StatusSnapshot::new().with("rbx", "KS-B_x", true))
            .await
            .unwrap();

        assert_eq!(handle.load().await.get("rbx", "KS-B_x"), Some(true));
        assert_eq!(handle.save_count(), 1);
    }
}
