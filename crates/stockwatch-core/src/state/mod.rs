// # Status Store Implementations
//
// This module provides implementations of the StatusStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::{DEFAULT_STATE_PATH, FileStatusStore};
pub use memory::MemoryStatusStore;
