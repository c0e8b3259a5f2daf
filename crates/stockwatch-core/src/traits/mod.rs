//! Core traits for stockwatch
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`InventorySource`]: Query a provider for plan availability
//! - [`Notifier`]: Deliver one availability change to a channel
//! - [`StatusStore`]: Persist the last observed availability between runs

pub mod inventory_source;
pub mod notifier;
pub mod status_store;

pub use inventory_source::InventorySource;
pub use notifier::Notifier;
pub use status_store::StatusStore;
