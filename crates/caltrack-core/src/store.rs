//! In-memory item store
//!
//! `ItemStore` owns the authoritative collection of items and the current
//! selection. It knows nothing about persistence or rendering; the
//! coordinator saves after every mutation that changes the collection.
//!
//! ## Ids
//!
//! A new item gets `max(existing ids) + 1`, or `0` when the store is empty.
//! Once `u64::MAX` is taken, `add` fails with [`StoreError::IdsExhausted`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = ItemStore::new();
//! let input = ItemInput::parse("Cookie", "400")?;
//! let cookie = store.add(input)?;
//!
//! store.set_current(Some(cookie.id));
//! store.update(ItemInput::parse("Cookie", "350")?);
//! assert_eq!(store.total_calories(), 350);
//! ```

use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use crate::models::{Item, ItemId, ItemInput};

/// Store mutations that cannot be carried out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No item ids left: the highest id is already {0}")]
    IdsExhausted(ItemId),
}

/// Authoritative collection of items plus the item being edited
#[derive(Debug, Default)]
pub struct ItemStore {
    /// Items in insertion (display) order
    items: Vec<Item>,
    /// Id of the item being edited, if any
    current: Option<ItemId>,
}

impl ItemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from a loaded snapshot
    ///
    /// Order is preserved. If the snapshot repeats an id, only the first
    /// occurrence is kept.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id);
                if !fresh {
                    warn!(id = %item.id, "Dropping item with duplicate id from snapshot");
                }
                fresh
            })
            .collect();

        Self {
            items,
            current: None,
        }
    }

    // ==================== Queries ====================

    /// All items in display order
    pub fn list(&self) -> &[Item] {
        &self.items
    }

    /// Get an item by id
    pub fn get_by_id(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of calories over all items, recomputed on every call
    pub fn total_calories(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.calories)).sum()
    }

    // ==================== Selection ====================

    /// Select the item being edited (or clear the selection)
    pub fn set_current(&mut self, id: Option<ItemId>) {
        self.current = id;
    }

    /// The selected item, if the selection still resolves
    pub fn current(&self) -> Option<&Item> {
        self.current.and_then(|id| self.get_by_id(id))
    }

    /// The selected id, whether or not it resolves
    pub fn current_id(&self) -> Option<ItemId> {
        self.current
    }

    // ==================== Mutations ====================

    /// Append a new item and return a copy of it
    pub fn add(&mut self, input: ItemInput) -> Result<Item, StoreError> {
        let item = Item::new(self.next_id()?, input.name(), input.calories());
        self.items.push(item.clone());
        Ok(item)
    }

    /// Overwrite the selected item's name and calories in place
    ///
    /// Returns `false` without changing anything when nothing is selected.
    pub fn update(&mut self, input: ItemInput) -> bool {
        let Some(id) = self.current else {
            return false;
        };

        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.name = input.name().to_string();
                item.calories = input.calories();
                true
            }
            None => false,
        }
    }

    /// Remove an item by id
    ///
    /// Returns `false` if no such item exists. Clears the selection when it
    /// named the removed item.
    pub fn delete(&mut self, id: ItemId) -> bool {
        let Some(pos) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };

        self.items.remove(pos);
        if self.current == Some(id) {
            self.current = None;
        }
        true
    }

    /// Remove every item
    ///
    /// The selection is left untouched; callers reset it themselves.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn next_id(&self) -> Result<ItemId, StoreError> {
        match self.items.iter().map(|item| item.id).max() {
            Some(max) => max.next().ok_or(StoreError::IdsExhausted(max)),
            None => Ok(ItemId(0)),
        }
    }
}
