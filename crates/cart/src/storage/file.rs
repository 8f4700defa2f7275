//! File-backed key-value store.
//!
//! All slots live in one JSON object (`{"key": "value", ...}`) inside the data
//! directory. Writes go to a temporary sibling file that is then renamed over
//! the original, so a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// File name of the slot document inside the data directory.
const STORAGE_FILE: &str = "local_storage.json";

/// Key-value store persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open (or lazily create) the store inside `data_dir`.
    ///
    /// The directory is created on first write, not here.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORAGE_FILE),
        }
    }

    /// Path of the backing JSON document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Slots to rewrite on `set`/`remove`. An unparseable document is
    /// replaced rather than blocking every later write.
    fn slots_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_slots() {
            Err(StorageError::Serialize(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing unreadable storage file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(slots)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), slots = slots.len(), "Wrote storage file");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots_for_write()?;
        slots.insert(key.to_owned(), value.to_owned());
        self.write_slots(&slots)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match self.read_slots() {
            Ok(mut slots) => {
                if slots.remove(key).is_some() {
                    self.write_slots(&slots)?;
                }
                Ok(())
            }
            Err(StorageError::Serialize(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing unreadable storage file");
                self.write_slots(&BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }
}
