//! Storage abstraction and implementations for goaltrack.
//!
//! Owner records are loaded and written back whole through the
//! [`OwnerStore`] trait. A JSON-file backend and an in-memory backend are
//! provided.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{OwnerStore, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
