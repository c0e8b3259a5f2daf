// # Status Store Trait
//
// Defines the interface for persisting the last observed availability.
//
// ## Purpose
//
// The store holds one [`StatusSnapshot`] between runs so that only
// availability *changes* produce notifications.
//
// ## Implementations
//
// - File-based: JSON document, see [`crate::state::FileStatusStore`]
// - In-memory: [`crate::state::MemoryStatusStore`]

use async_trait::async_trait;

use crate::model::StatusSnapshot;

/// Trait for status store implementations
///
/// # Load Policy
///
/// `load` never fails. A missing store and an unreadable store both yield an
/// empty snapshot, so a damaged state file can only cause every current status
/// to look new. Implementations should log which case occurred.
///
/// # Save Policy
///
/// `save` replaces the stored snapshot entirely. Entries absent from the
/// argument are gone afterwards.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Load the previously saved snapshot, or an empty one
    async fn load(&self) -> StatusSnapshot;

    /// Replace the stored snapshot
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully written
    /// - `Err(Error)`: Storage error
    async fn save(&self, snapshot: &StatusSnapshot) -> Result<(), crate::Error>;
}
