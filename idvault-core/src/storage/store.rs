//! The keyed entity store interface.

use crate::error::StorageResult;

/// A collection of `T` keyed by string id.
pub trait EntityStore<T>: Send + Sync {
    /// Returns `true` if an item is stored under `id`.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be queried.
    fn exists(&self, id: &str) -> StorageResult<bool>;

    /// Stores `item` under a new `id`.
    ///
    /// # Errors
    /// Returns [`crate::StorageError::AlreadyExists`] if `id` is taken, or a
    /// backend error.
    fn create(&self, id: &str, item: &T) -> StorageResult<()>;

    /// Returns the item stored under `id`, if any.
    ///
    /// # Errors
    /// Returns an error if the item exists but cannot be read.
    fn get(&self, id: &str) -> StorageResult<Option<T>>;

    /// Removes the item under `id`. Returns `false` if there was none.
    ///
    /// # Errors
    /// Returns an error if removal fails.
    fn delete(&self, id: &str) -> StorageResult<bool>;

    /// Ids of every stored item, in the same order as [`EntityStore::list`].
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be listed.
    fn ids(&self) -> StorageResult<Vec<String>>;

    /// Every stored item.
    ///
    /// # Errors
    /// Returns an error if any item cannot be read.
    fn list(&self) -> StorageResult<Vec<T>>;

    /// Stores `item` under `id`, replacing any existing item.
    ///
    /// # Errors
    /// Returns an error if removal or creation fails.
    fn put(&self, id: &str, item: &T) -> StorageResult<()> {
        self.delete(id)?;
        self.create(id, item)
    }
}
