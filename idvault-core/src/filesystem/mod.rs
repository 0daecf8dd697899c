//! Filesystem abstraction used by file-backed stores and the vault router.
//!
//! Nothing in this crate touches the disk directly. Every file operation goes
//! through [`FileSystem`] or [`AsyncFileSystem`], so any backend (the local
//! disk, memory, a platform bridge) can be swapped in.
//!
//! Both traits share method names. Import only the one you need, or call
//! through the trait (`FileSystem::exists(&fs, path)`) when both are in scope.

mod local;
mod memory;
mod router;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageResult;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;
pub use router::DynamicVaultFilesystem;

/// Blocking text-file operations.
///
/// Missing files surface as [`crate::StorageError::NotFound`].
pub trait FileSystem: Send + Sync {
    /// Returns `true` if a file or directory exists at `path`.
    ///
    /// # Errors
    /// Returns an error if existence cannot be determined.
    fn exists(&self, path: &Path) -> StorageResult<bool>;

    /// Reads the whole file as UTF-8.
    ///
    /// # Errors
    /// Returns an error if the file is missing or unreadable.
    fn read_file(&self, path: &Path) -> StorageResult<String>;

    /// Writes `data`, replacing any existing content. The parent directory
    /// must exist.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn write_file(&self, path: &Path, data: &str) -> StorageResult<()>;

    /// Deletes a file.
    ///
    /// # Errors
    /// Returns an error if the file is missing or cannot be removed.
    fn delete_file(&self, path: &Path) -> StorageResult<()>;

    /// Deletes a directory and everything below it. A missing directory is
    /// not an error.
    ///
    /// # Errors
    /// Returns an error if removal fails.
    fn delete_dir(&self, path: &Path) -> StorageResult<()>;

    /// Lists the entry names of a directory, sorted.
    ///
    /// # Errors
    /// Returns an error if the directory is missing or unreadable.
    fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>>;

    /// Creates a directory and all missing parents.
    ///
    /// # Errors
    /// Returns an error if creation fails.
    fn ensure_dir(&self, path: &Path) -> StorageResult<()>;

    /// Sets permission bits (e.g. `0o600`).
    ///
    /// # Errors
    /// Returns an error if `path` is missing or permissions cannot be set.
    fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()>;
}

/// Non-blocking counterpart of [`FileSystem`], with identical semantics.
#[async_trait]
pub trait AsyncFileSystem: Send + Sync {
    /// See [`FileSystem::exists`].
    async fn exists(&self, path: &Path) -> StorageResult<bool>;
    /// See [`FileSystem::read_file`].
    async fn read_file(&self, path: &Path) -> StorageResult<String>;
    /// See [`FileSystem::write_file`].
    async fn write_file(&self, path: &Path, data: &str) -> StorageResult<()>;
    /// See [`FileSystem::delete_file`].
    async fn delete_file(&self, path: &Path) -> StorageResult<()>;
    /// See [`FileSystem::delete_dir`].
    async fn delete_dir(&self, path: &Path) -> StorageResult<()>;
    /// See [`FileSystem::read_dir`].
    async fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>>;
    /// See [`FileSystem::ensure_dir`].
    async fn ensure_dir(&self, path: &Path) -> StorageResult<()>;
    /// See [`FileSystem::chmod`].
    async fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()>;
}

impl<T: FileSystem + ?Sized> FileSystem for Arc<T> {
    fn exists(&self, path: &Path) -> StorageResult<bool> {
        (**self).exists(path)
    }

    fn read_file(&self, path: &Path) -> StorageResult<String> {
        (**self).read_file(path)
    }

    fn write_file(&self, path: &Path, data: &str) -> StorageResult<()> {
        (**self).write_file(path, data)
    }

    fn delete_file(&self, path: &Path) -> StorageResult<()> {
        (**self).delete_file(path)
    }

    fn delete_dir(&self, path: &Path) -> StorageResult<()> {
        (**self).delete_dir(path)
    }

    fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        (**self).read_dir(path)
    }

    fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        (**self).ensure_dir(path)
    }

    fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()> {
        (**self).chmod(path, mode)
    }
}
