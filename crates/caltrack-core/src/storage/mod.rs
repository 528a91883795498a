//! Storage layer
//!
//! Handles the item snapshot and the slot media it lives in.
//!
//! ## Architecture
//!
//! - **`ItemPersistence`**: serializes the collection to one slot
//! - **`SlotBackend`**: the medium (files on disk, or memory)

pub mod error;
pub mod persistence;
pub mod slots;

pub use error::{StorageError, StorageResult};
pub use persistence::{ItemPersistence, ITEMS_SLOT};
pub use slots::{FileSlots, MemorySlots, SlotBackend};
