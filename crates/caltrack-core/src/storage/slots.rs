//! Slot backends
//!
//! A slot is a named text value in some durable medium. The persistence
//! adapter only needs three operations from it: read, overwrite, remove.
//!
//! - `FileSlots`: one file per slot under a data directory, written
//!   atomically (write to temp file, sync, rename)
//! - `MemorySlots`: in-process map, for tests and throwaway sessions

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::{StorageError, StorageResult};

/// Durable key-value medium holding text slots
pub trait SlotBackend {
    /// Read a slot. Returns `Ok(None)` if the slot does not exist.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite a slot with new content
    fn write(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a slot. Removing an absent slot succeeds.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// Slots stored as `<dir>/<key>.json` files
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing a slot
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SlotBackend for FileSlots {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadError { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        atomic_write(&self.slot_path(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::RemoveError { path, source }),
        }
    }
}

/// Slots held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a slot currently exists
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }
}

impl SlotBackend for MemorySlots {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_slots_read_missing() {
        let temp_dir = TempDir::new().unwrap();
        let slots = FileSlots::new(temp_dir.path());

        assert!(slots.read("items").unwrap().is_none());
    }

    #[test]
    fn test_file_slots_write_read_remove() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = FileSlots::new(temp_dir.path());

        slots.write("items", "[]").unwrap();
        assert!(slots.slot_path("items").exists());
        assert_eq!(slots.read("items").unwrap().as_deref(), Some("[]"));

        slots.write("items", "[1]").unwrap();
        assert_eq!(slots.read("items").unwrap().as_deref(), Some("[1]"));

        slots.remove("items").unwrap();
        assert!(!slots.slot_path("items").exists());
        assert!(slots.read("items").unwrap().is_none());
    }

    #[test]
    fn test_file_slots_remove_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = FileSlots::new(temp_dir.path());

        slots.remove("items").unwrap();
    }

    #[test]
    fn test_file_slots_remove_failure() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = FileSlots::new(temp_dir.path());
        // A directory where the slot file should be cannot be unlinked
        fs::create_dir(slots.slot_path("items")).unwrap();

        let err = slots.remove("items").unwrap_err();

        assert!(matches!(err, StorageError::RemoveError { .. }));
        assert!(err.to_string().starts_with("Failed to remove"));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut slots = FileSlots::new(temp_dir.path());

        slots.write("items", "[]").unwrap();

        assert!(!temp_dir.path().join("items.tmp").exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let mut slots = FileSlots::new(&nested);

        slots.write("items", "test data").unwrap();

        let content = fs::read_to_string(nested.join("items.json")).unwrap();
        assert_eq!(content, "test data");
    }

    #[test]
    fn test_memory_slots() {
        let mut slots = MemorySlots::new();
        assert!(slots.read("items").unwrap().is_none());

        slots.write("items", "[]").unwrap();
        assert!(slots.contains("items"));
        assert_eq!(slots.read("items").unwrap().as_deref(), Some("[]"));

        slots.remove("items").unwrap();
        assert!(!slots.contains("items"));
    }
}
