//! Routes file operations into the active vault's directory.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{AsyncFileSystem, FileSystem};
use crate::context::VaultContext;
use crate::error::{StorageError, StorageResult};
use crate::events::{FileOperation, VaultEvent};
use crate::storage::VaultPaths;
use crate::vault_id::VaultId;

/// Decorator that rewrites every relative path to
/// `<base dir>/<active vault id>/<path>` before handing it to `F`.
///
/// - The active vault is read from the [`VaultContext`] on every call;
///   without one, every operation fails with [`StorageError::NoActiveVault`].
/// - `write_file` ensures the vault directory exists first.
/// - An empty path names the vault directory itself.
/// - Completed reads, writes and deletes of files emit
///   [`VaultEvent::FileChanged`] with the routed path.
/// - Absolute paths and `..` components are rejected with
///   [`StorageError::InvalidPath`].
///
/// Implements [`FileSystem`] and/or [`AsyncFileSystem`], matching `F`.
#[derive(Debug)]
pub struct DynamicVaultFilesystem<F> {
    inner: F,
    paths: VaultPaths,
    context: VaultContext,
}

impl<F> DynamicVaultFilesystem<F> {
    /// Wraps `inner`, routing into vault directories below `base_dir`.
    pub fn new(inner: F, base_dir: impl AsRef<Path>, context: VaultContext) -> Self {
        Self {
            inner,
            paths: VaultPaths::new(base_dir),
            context,
        }
    }

    /// The wrapped filesystem.
    pub const fn inner(&self) -> &F {
        &self.inner
    }

    /// The context supplying the active vault.
    pub const fn context(&self) -> &VaultContext {
        &self.context
    }

    /// The base directory holding every vault directory.
    pub fn base_dir(&self) -> &Path {
        self.paths.root()
    }

    /// Directory of the active vault.
    ///
    /// # Errors
    /// Returns [`StorageError::NoActiveVault`] if no vault is active.
    pub fn active_vault_dir(&self) -> StorageResult<PathBuf> {
        let vault_id = self.context.require_active_vault()?;
        Ok(self.paths.vault_dir(&vault_id))
    }

    fn resolve(&self, path: &Path) -> StorageResult<(VaultId, PathBuf)> {
        let vault_id = self.context.require_active_vault()?;
        let vault_dir = self.paths.vault_dir(&vault_id);
        if path.as_os_str().is_empty() {
            return Ok((vault_id, vault_dir));
        }
        if path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::InvalidPath(path.display().to_string()));
        }
        Ok((vault_id, vault_dir.join(path)))
    }

    fn notify(&self, vault_id: VaultId, full_path: &Path, operation: FileOperation) {
        log::debug!("{operation} {} in vault {vault_id}", full_path.display());
        self.context.emit(&VaultEvent::FileChanged {
            file_path: full_path.display().to_string(),
            vault_id,
            operation,
        });
    }
}

impl<F: FileSystem> FileSystem for DynamicVaultFilesystem<F> {
    fn exists(&self, path: &Path) -> StorageResult<bool> {
        let (_, full) = self.resolve(path)?;
        self.inner.exists(&full)
    }

    fn read_file(&self, path: &Path) -> StorageResult<String> {
        let (vault_id, full) = self.resolve(path)?;
        let content = self.inner.read_file(&full)?;
        self.notify(vault_id, &full, FileOperation::Read);
        Ok(content)
    }

    fn write_file(&self, path: &Path, data: &str) -> StorageResult<()> {
        let (vault_id, full) = self.resolve(path)?;
        self.inner.ensure_dir(&self.paths.vault_dir(&vault_id))?;
        self.inner.write_file(&full, data)?;
        self.notify(vault_id, &full, FileOperation::Write);
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> StorageResult<()> {
        let (vault_id, full) = self.resolve(path)?;
        self.inner.delete_file(&full)?;
        self.notify(vault_id, &full, FileOperation::Delete);
        Ok(())
    }

    fn delete_dir(&self, path: &Path) -> StorageResult<()> {
        let (_, full) = self.resolve(path)?;
        self.inner.delete_dir(&full)
    }

    fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        let (_, full) = self.resolve(path)?;
        self.inner.read_dir(&full)
    }

    fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        let (_, full) = self.resolve(path)?;
        self.inner.ensure_dir(&full)
    }

    fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()> {
        let (_, full) = self.resolve(path)?;
        self.inner.chmod(&full, mode)
    }
}

#[async_trait]
impl<F: AsyncFileSystem> AsyncFileSystem for DynamicVaultFilesystem<F> {
    async fn exists(&self, path: &Path) -> StorageResult<bool> {
        let (_, full) = self.resolve(path)?;
        self.inner.exists(&full).await
    }

    async fn read_file(&self, path: &Path) -> StorageResult<String> {
        let (vault_id, full) = self.resolve(path)?;
        let content = self.inner.read_file(&full).await?;
        self.notify(vault_id, &full, FileOperation::Read);
        Ok(content)
    }

    async fn write_file(&self, path: &Path, data: &str) -> StorageResult<()> {
        let (vault_id, full) = self.resolve(path)?;
        self.inner
            .ensure_dir(&self.paths.vault_dir(&vault_id))
            .await?;
        self.inner.write_file(&full, data).await?;
        self.notify(vault_id, &full, FileOperation::Write);
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> StorageResult<()> {
        let (vault_id, full) = self.resolve(path)?;
        self.inner.delete_file(&full).await?;
        self.notify(vault_id, &full, FileOperation::Delete);
        Ok(())
    }

    async fn delete_dir(&self, path: &Path) -> StorageResult<()> {
        let (_, full) = self.resolve(path)?;
        self.inner.delete_dir(&full).await
    }

    async fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        let (_, full) = self.resolve(path)?;
        self.inner.read_dir(&full).await
    }

    async fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        let (_, full) = self.resolve(path)?;
        self.inner.ensure_dir(&full).await
    }

    async fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()> {
        let (_, full) = self.resolve(path)?;
        self.inner.chmod(&full, mode).await
    }
}
