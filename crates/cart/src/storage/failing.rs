//! Failure-injecting store for exercising degraded persistence.

use std::cell::Cell;
use std::rc::Rc;

use super::{KeyValueStore, MemoryStore, StorageError};

/// Wraps a [`MemoryStore`] and fails reads or writes on demand.
///
/// Clones share both the underlying map and the failure switches, so a test
/// can keep a handle after moving the store into a cart and flip failures
/// mid-session. Writes fail with `QuotaExceeded`, reads with `Unavailable`.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
}

impl FailingStore {
    /// Wrap `inner` with all failures switched off.
    #[must_use]
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// The wrapped store, for inspecting what was actually persisted.
    #[must_use]
    pub const fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::QuotaExceeded);
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::QuotaExceeded);
        }
        self.inner.remove(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_switches_are_shared() {
        let mut store = FailingStore::default();
        let handle = store.clone();

        store.set("k", "v").unwrap();
        handle.set_fail_writes(true);
        assert!(matches!(
            store.set("k", "w"),
            Err(StorageError::QuotaExceeded)
        ));
        assert_eq!(handle.inner().peek("k").as_deref(), Some("v"));

        handle.set_fail_reads(true);
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable(_))));

        handle.set_fail_reads(false);
        handle.set_fail_writes(false);
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }
}
