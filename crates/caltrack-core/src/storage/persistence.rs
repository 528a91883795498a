//! Item snapshot persistence
//!
//! Mirrors the item collection to a single slot as a JSON array:
//!
//! ```text
//! [{"id":0,"name":"Steak Dinner","calories":1200},{"id":1,"name":"Cookie","calories":400}]
//! ```
//!
//! Every save overwrites the whole snapshot. A missing slot reads as an
//! empty collection, and so does one that cannot be read or parsed.

use tracing::{debug, warn};

use super::error::StorageResult;
use super::slots::SlotBackend;
use crate::models::Item;

/// Slot holding the item snapshot
pub const ITEMS_SLOT: &str = "items";

/// Persistence adapter for the item collection
pub struct ItemPersistence<B> {
    backend: B,
}

impl<B: SlotBackend> ItemPersistence<B> {
    /// Create a persistence adapter over a slot backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Get the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Serialize the collection and overwrite the slot
    pub fn save(&mut self, items: &[Item]) -> StorageResult<()> {
        let snapshot = serde_json::to_string(items)?;
        self.backend.write(ITEMS_SLOT, &snapshot)?;
        debug!(count = items.len(), "Saved item snapshot");
        Ok(())
    }

    /// Read the snapshot back
    ///
    /// Never fails: an absent, unreadable, or malformed slot yields an
    /// empty collection.
    pub fn load(&self) -> Vec<Item> {
        let content = match self.backend.read(ITEMS_SLOT) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Could not read item snapshot, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Item>>(&content) {
            Ok(items) => {
                debug!(count = items.len(), "Loaded item snapshot");
                items
            }
            Err(e) => {
                warn!(error = %e, "Item snapshot is malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Delete the snapshot slot entirely
    pub fn remove(&mut self) -> StorageResult<()> {
        self.backend.remove(ITEMS_SLOT)?;
        debug!("Removed item snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemId;
    use crate::storage::{FileSlots, MemorySlots};
    use tempfile::TempDir;

    fn sample_items() -> Vec<Item> {
        vec![
            Item::new(ItemId(0), "Steak Dinner", 1200),
            Item::new(ItemId(1), "Cookie", 400),
        ]
    }

    #[test]
    fn test_load_absent_slot_is_empty() {
        let persistence = ItemPersistence::new(MemorySlots::new());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let mut persistence = ItemPersistence::new(MemorySlots::new());

        persistence.save(&sample_items()).unwrap();

        assert_eq!(persistence.load(), sample_items());
    }

    #[test]
    fn test_snapshot_format() {
        let mut persistence = ItemPersistence::new(MemorySlots::new());
        persistence.save(&sample_items()).unwrap();

        let raw = persistence.backend().read(ITEMS_SLOT).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"id":0,"name":"Steak Dinner","calories":1200},{"id":1,"name":"Cookie","calories":400}]"#
        );
    }

    #[test]
    fn test_load_save_round_trip() {
        let mut persistence = ItemPersistence::new(MemorySlots::new());
        persistence.save(&sample_items()).unwrap();
        let before = persistence.backend().read(ITEMS_SLOT).unwrap();

        let loaded = persistence.load();
        persistence.save(&loaded).unwrap();

        assert_eq!(persistence.backend().read(ITEMS_SLOT).unwrap(), before);
        assert_eq!(persistence.load(), loaded);
    }

    #[test]
    fn test_save_overwrites() {
        let mut persistence = ItemPersistence::new(MemorySlots::new());
        persistence.save(&sample_items()).unwrap();

        persistence.save(&sample_items()[1..]).unwrap();

        assert_eq!(persistence.load(), vec![Item::new(ItemId(1), "Cookie", 400)]);
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let mut slots = MemorySlots::new();
        slots.write(ITEMS_SLOT, "{not json").unwrap();
        let persistence = ItemPersistence::new(slots);

        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let mut slots = MemorySlots::new();
        slots
            .write(ITEMS_SLOT, r#"[{"id":0,"name":"Cookie","calories":-3}]"#)
            .unwrap();
        let persistence = ItemPersistence::new(slots);

        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut persistence = ItemPersistence::new(MemorySlots::new());
        persistence.save(&sample_items()).unwrap();

        persistence.remove().unwrap();

        assert!(!persistence.backend().contains(ITEMS_SLOT));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_file_backed_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut persistence = ItemPersistence::new(FileSlots::new(temp_dir.path()));
            persistence.save(&sample_items()).unwrap();
        }

        let persistence = ItemPersistence::new(FileSlots::new(temp_dir.path()));
        assert_eq!(persistence.load(), sample_items());
    }

    #[test]
    fn test_file_backed_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let slots = FileSlots::new(temp_dir.path());
        std::fs::write(slots.slot_path(ITEMS_SLOT), "garbage").unwrap();

        let persistence = ItemPersistence::new(slots);
        assert!(persistence.load().is_empty());
    }
}
