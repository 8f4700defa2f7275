//! Durable key-value storage for the cart.
//!
//! The cart persists through the narrow [`KeyValueStore`] trait: a string slot
//! per key, in the spirit of browser local storage. Backends:
//!
//! - [`MemoryStore`] - in-process map, shared between clones
//! - [`FileStore`] - JSON object file in a data directory
//! - [`FailingStore`] - wraps a [`MemoryStore`] and injects read/write failures

mod failing;
mod file;
mod memory;

pub use failing::FailingStore;
pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend refused the write because it is full.
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    /// The backend cannot be reached at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A synchronous string-keyed persistence slot store.
pub trait KeyValueStore {
    /// Read the value stored at `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value at `key`. Deleting an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
