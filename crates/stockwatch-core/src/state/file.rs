// # File Status Store
//
// File-based implementation of StatusStore.
//
// ## Purpose
//
// Persists the last observed availability between invocations so that only
// changes trigger notifications.
//
// ## Failure Behavior
//
// - Missing file: empty snapshot (first run)
// - Unreadable or corrupted file: empty snapshot, logged as a warning
// - Writes overwrite the file in place. There is no temp-file rename and no
//   backup, so a crash mid-write leaves a corrupted file that the next load
//   treats as empty.
//
// ## File Format
//
// ```json
// {
//   "last_updated": "2025-01-09T12:00:00.000000+00:00",
//   "status": {
//     "bhs": { "KS-A_24ska01": false }
//   }
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::model::{StatusSnapshot, StoredDocument};
use crate::traits::status_store::StatusStore;

/// Default state file location, relative to the working directory
pub const DEFAULT_STATE_PATH: &str = "server_status.json";

/// Why a load produced no prior state
#[derive(Debug)]
enum LoadOutcome {
    Loaded(StoredDocument),
    Missing,
    Unreadable(std::io::Error),
    Corrupted(serde_json::Error),
}

/// File-based status store
///
/// # Example
///
/// ```rust,no_run
/// use stockwatch_core::state::FileStatusStore;
/// use stockwatch_core::traits::StatusStore;
/// use stockwatch_core::StatusSnapshot;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStatusStore::new("server_status.json");
///
///     let previous = store.load().await;
///     let current = StatusSnapshot::new().with("bhs", "KS-A_24ska01", true);
///     store.save(&current).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStatusStore {
    path: PathBuf,
}

impl FileStatusStore {
    /// Create a store backed by `path`. Nothing is read until [`StatusStore::load`].
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(e) => return LoadOutcome::Unreadable(e),
        };

        match serde_json::from_str::<StoredDocument>(&content) {
            Ok(doc) => LoadOutcome::Loaded(doc),
            Err(e) => LoadOutcome::Corrupted(e),
        }
    }
}

#[async_trait]
impl StatusStore for FileStatusStore {
    async fn load(&self) -> StatusSnapshot {
        match self.read_document().await {
            LoadOutcome::Loaded(doc) => {
                tracing::debug!(
                    path = %self.path.display(),
                    last_updated = doc.last_updated.as_deref().unwrap_or("unknown"),
                    entries = doc.status.len(),
                    "Loaded previous status"
                );
                doc.status
            }
            LoadOutcome::Missing => {
                tracing::debug!(
                    "State file {} does not exist, starting from empty status",
                    self.path.display()
                );
                StatusSnapshot::new()
            }
            LoadOutcome::Unreadable(e) => {
                tracing::warn!(
                    "Failed to read state file {}: {}. Treating every status as new.",
                    self.path.display(),
                    e
                );
                StatusSnapshot::new()
            }
            LoadOutcome::Corrupted(e) => {
                tracing::warn!(
                    "State file {} is corrupted: {}. Treating every status as new.",
                    self.path.display(),
                    e
                );
                StatusSnapshot::new()
            }
        }
    }

    async fn save(&self, snapshot: &StatusSnapshot) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(&StoredDocument::now(snapshot.clone()))
            .map_err(|e| Error::state_store(format!("Failed to serialize status: {}", e)))?;

        fs::write(&self.path, json).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to write state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Status written to file: {}", self.path.display());
        Ok(())
    }
}
