// # stockwatch-core
//
// Core library for the stockwatch server availability notifier.
//
// ## Architecture Overview
//
// This library provides the functionality for one availability poll:
// - **InventorySource**: Trait for querying plan availability per datacenter
// - **Notifier**: Trait for delivering one availability change
// - **StatusStore**: Trait for persisting the last observed availability
// - **ChangeEngine**: Orchestrates fetch → diff → notify → save
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Change detection is separate from provider and channel code
// 2. **Sequential**: One request at a time, in plan order
// 3. **Library-First**: The binary only reads configuration and wires components
// 4. **Change-Only**: Only availability transitions produce notifications

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::WatchConfig;
pub use engine::{ChangeEngine, RunReport};
pub use error::{Error, Result};
pub use model::{
    AvailabilityIndex, AvailabilityRecord, PlanSet, PlanSpec, StatusSnapshot, StoredDocument,
    Transition,
};
pub use state::{FileStatusStore, MemoryStatusStore};
pub use traits::{InventorySource, Notifier, StatusStore};
