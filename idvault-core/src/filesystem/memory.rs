//! In-memory backend for tests and ephemeral vaults.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{AsyncFileSystem, FileSystem};
use crate::error::{StorageError, StorageResult};

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    modes: BTreeMap<PathBuf, u32>,
}

impl Tree {
    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || path == Path::new("/") || self.dirs.contains(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_dir(path)
    }
}

/// Thread-safe [`FileSystem`] and [`AsyncFileSystem`] kept entirely in
/// memory.
///
/// Directories are tracked explicitly, so writing into a directory that was
/// never ensured fails the same way it does on disk.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    tree: RwLock<Tree>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of every stored file, sorted.
    ///
    /// # Errors
    /// Returns [`StorageError::Lock`] if the lock is poisoned.
    pub fn files(&self) -> StorageResult<Vec<PathBuf>> {
        Ok(self.read()?.files.keys().cloned().collect())
    }

    /// Permission bits last set on `path` with `chmod`.
    ///
    /// # Errors
    /// Returns [`StorageError::Lock`] if the lock is poisoned.
    pub fn mode(&self, path: &Path) -> StorageResult<Option<u32>> {
        Ok(self.read()?.modes.get(path).copied())
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tree>> {
        self.tree
            .read()
            .map_err(|_| StorageError::lock("memory filesystem lock poisoned"))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tree>> {
        self.tree
            .write()
            .map_err(|_| StorageError::lock("memory filesystem lock poisoned"))
    }
}

fn not_found(path: &Path) -> StorageError {
    StorageError::not_found(path.display().to_string())
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> StorageResult<bool> {
        Ok(self.read()?.exists(path))
    }

    fn read_file(&self, path: &Path) -> StorageResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, data: &str) -> StorageResult<()> {
        let mut tree = self.write()?;
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        if !tree.is_dir(parent) {
            return Err(not_found(parent));
        }
        tree.files.insert(path.to_path_buf(), data.to_string());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> StorageResult<()> {
        let mut tree = self.write()?;
        tree.files.remove(path).ok_or_else(|| not_found(path))?;
        tree.modes.remove(path);
        Ok(())
    }

    fn delete_dir(&self, path: &Path) -> StorageResult<()> {
        let mut tree = self.write()?;
        tree.files.retain(|p, _| !p.starts_with(path));
        tree.dirs.retain(|p| !p.starts_with(path));
        tree.modes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        let tree = self.read()?;
        if !tree.is_dir(path) {
            return Err(not_found(path));
        }
        let children = tree
            .files
            .keys()
            .chain(tree.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect::<BTreeSet<_>>();
        Ok(children.into_iter().collect())
    }

    fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        let mut tree = self.write()?;
        if tree.files.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.display().to_string()));
        }
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            tree.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()> {
        let mut tree = self.write()?;
        if !tree.exists(path) {
            return Err(not_found(path));
        }
        tree.modes.insert(path.to_path_buf(), mode);
        Ok(())
    }
}

#[async_trait]
impl AsyncFileSystem for MemoryFileSystem {
    async fn exists(&self, path: &Path) -> StorageResult<bool> {
        FileSystem::exists(self, path)
    }

    async fn read_file(&self, path: &Path) -> StorageResult<String> {
        FileSystem::read_file(self, path)
    }

    async fn write_file(&self, path: &Path, data: &str) -> StorageResult<()> {
        FileSystem::write_file(self, path, data)
    }

    async fn delete_file(&self, path: &Path) -> StorageResult<()> {
        FileSystem::delete_file(self, path)
    }

    async fn delete_dir(&self, path: &Path) -> StorageResult<()> {
        FileSystem::delete_dir(self, path)
    }

    async fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        FileSystem::read_dir(self, path)
    }

    async fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        FileSystem::ensure_dir(self, path)
    }

    async fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()> {
        FileSystem::chmod(self, path, mode)
    }
}
