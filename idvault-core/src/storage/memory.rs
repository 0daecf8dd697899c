//! In-memory entity store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use super::EntityStore;
use crate::error::{StorageError, StorageResult};

/// Thread-safe [`EntityStore`] backed by an insertion-ordered map.
///
/// `list` returns items in the order their ids were first created.
#[derive(Debug)]
pub struct MemoryStore<T> {
    items: RwLock<IndexMap<String, T>>,
}

impl<T> MemoryStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: RwLock::new(IndexMap::new()),
        }
    }

    /// Returns the number of stored items.
    ///
    /// # Errors
    /// Returns [`StorageError::Lock`] if the lock is poisoned.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns `true` if nothing is stored.
    ///
    /// # Errors
    /// Returns [`StorageError::Lock`] if the lock is poisoned.
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Removes every item.
    ///
    /// # Errors
    /// Returns [`StorageError::Lock`] if the lock is poisoned.
    pub fn clear(&self) -> StorageResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, IndexMap<String, T>>> {
        self.items
            .read()
            .map_err(|_| StorageError::lock("memory store lock poisoned"))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, IndexMap<String, T>>> {
        self.items
            .write()
            .map_err(|_| StorageError::lock("memory store lock poisoned"))
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> EntityStore<T> for MemoryStore<T> {
    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.read()?.contains_key(id))
    }

    fn create(&self, id: &str, item: &T) -> StorageResult<()> {
        let mut items = self.write()?;
        if items.contains_key(id) {
            return Err(StorageError::AlreadyExists(id.to_string()));
        }
        items.insert(id.to_string(), item.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> StorageResult<Option<T>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn delete(&self, id: &str) -> StorageResult<bool> {
        Ok(self.write()?.shift_remove(id).is_some())
    }

    fn ids(&self) -> StorageResult<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn list(&self) -> StorageResult<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn put(&self, id: &str, item: &T) -> StorageResult<()> {
        self.write()?.insert(id.to_string(), item.clone());
        Ok(())
    }
}
