//! Whole-vault persistence and lifecycle.

use std::path::Path;

use super::VaultPaths;
use crate::context::VaultContext;
use crate::error::{StorageError, StorageResult};
use crate::filesystem::FileSystem;
use crate::vault::IdentityVault;
use crate::vault_id::VaultId;

/// Permission bits of a written vault document: owner read/write only.
pub const VAULT_DOCUMENT_MODE: u32 = 0o600;

/// Vault documents under a base directory, one directory per vault.
///
/// A directory counts as a vault when its name is a valid [`VaultId`] and it
/// holds a `vault.json` document. Documents are written with
/// [`VAULT_DOCUMENT_MODE`].
#[derive(Debug, Clone)]
pub struct VaultStore<F> {
    fs: F,
    paths: VaultPaths,
}

impl<F: FileSystem> VaultStore<F> {
    /// Creates a store over `root`.
    pub fn new(fs: F, root: impl AsRef<Path>) -> Self {
        Self {
            fs,
            paths: VaultPaths::new(root),
        }
    }

    /// Layout of the base directory.
    pub const fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    /// Returns `true` if vault `id` has a document.
    ///
    /// # Errors
    /// Returns an error if the filesystem cannot be queried.
    pub fn exists(&self, id: &VaultId) -> StorageResult<bool> {
        self.fs.exists(&self.paths.document_path(id))
    }

    /// Writes the document of a vault that does not exist yet.
    ///
    /// # Errors
    /// Returns [`StorageError::AlreadyExists`] if the vault has a document.
    pub fn create(&self, vault: &IdentityVault) -> StorageResult<()> {
        if self.exists(vault.id())? {
            return Err(StorageError::AlreadyExists(vault.id().to_string()));
        }
        self.write(vault)
    }

    /// Reads vault `id`, if it exists.
    ///
    /// # Errors
    /// Returns [`StorageError::Vault`] if the document does not parse, or a
    /// filesystem error.
    pub fn get(&self, id: &VaultId) -> StorageResult<Option<IdentityVault>> {
        let path = self.paths.document_path(id);
        if !self.fs.exists(&path)? {
            return Ok(None);
        }
        let json = self.fs.read_file(&path)?;
        Ok(Some(IdentityVault::from_json(&json)?))
    }

    /// Replaces the document of an existing vault.
    ///
    /// # Errors
    /// Returns [`StorageError::NotFound`] if the vault has no document.
    pub fn update(&self, vault: &IdentityVault) -> StorageResult<()> {
        if !self.exists(vault.id())? {
            return Err(StorageError::not_found(format!("vault {}", vault.id())));
        }
        self.write(vault)
    }

    /// Removes vault `id` with its directory and every exported record.
    /// Returns `false` if there was no such directory.
    ///
    /// # Errors
    /// Returns an error if removal fails.
    pub fn delete(&self, id: &VaultId) -> StorageResult<bool> {
        let dir = self.paths.vault_dir(id);
        if !self.fs.exists(&dir)? {
            return Ok(false);
        }
        self.fs.delete_dir(&dir)?;
        log::debug!("deleted vault {id}");
        Ok(true)
    }

    /// Ids of every stored vault, sorted.
    ///
    /// # Errors
    /// Returns an error if the base directory cannot be listed.
    pub fn ids(&self) -> StorageResult<Vec<VaultId>> {
        let root = self.paths.root();
        if !self.fs.exists(root)? {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for name in self.fs.read_dir(root)? {
            // stray files and foreign directories are not vaults
            let Ok(id) = VaultId::create(name) else {
                continue;
            };
            if self.exists(&id)? {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Every stored vault, ordered by id.
    ///
    /// # Errors
    /// Returns the first read or parse error.
    pub fn list(&self) -> StorageResult<Vec<IdentityVault>> {
        let mut vaults = Vec::new();
        for id in self.ids()? {
            if let Some(vault) = self.get(&id)? {
                vaults.push(vault);
            }
        }
        Ok(vaults)
    }

    fn write(&self, vault: &IdentityVault) -> StorageResult<()> {
        let path = self.paths.document_path(vault.id());
        self.fs.ensure_dir(&self.paths.vault_dir(vault.id()))?;
        self.fs.write_file(&path, &vault.to_json_pretty()?)?;
        self.fs.chmod(&path, VAULT_DOCUMENT_MODE)?;
        log::debug!("wrote vault {}", vault.id());
        Ok(())
    }
}

/// Vault lifecycle: create, select, read, update, list and delete vaults.
///
/// Selecting a vault with [`VaultOperator::use_vault`] makes it the active
/// vault of the operator's [`VaultContext`], which routes every
/// [`crate::DynamicVaultFilesystem`] sharing that context.
#[derive(Debug, Clone)]
pub struct VaultOperator<F> {
    store: VaultStore<F>,
    context: VaultContext,
}

impl<F: FileSystem> VaultOperator<F> {
    /// Creates an operator over `store` that selects vaults on `context`.
    pub const fn new(store: VaultStore<F>, context: VaultContext) -> Self {
        Self { store, context }
    }

    /// The underlying store.
    pub const fn store(&self) -> &VaultStore<F> {
        &self.store
    }

    /// The context vaults are selected on.
    pub const fn context(&self) -> &VaultContext {
        &self.context
    }

    /// Makes vault `id` the active vault.
    ///
    /// # Errors
    /// Returns [`StorageError::NotFound`] if the vault does not exist, or
    /// [`StorageError::Vault`] if `id` is invalid.
    pub fn use_vault(&self, id: &str) -> StorageResult<VaultId> {
        let id = parse_id(id)?;
        if !self.store.exists(&id)? {
            return Err(StorageError::not_found(format!("vault {id}")));
        }
        self.context.set_active_vault(Some(id.clone()));
        Ok(id)
    }

    /// Creates and stores an empty vault.
    ///
    /// # Errors
    /// Returns [`StorageError::AlreadyExists`] if the vault exists, or
    /// [`StorageError::Vault`] if `id` is invalid.
    pub fn create_new(&self, id: &str) -> StorageResult<IdentityVault> {
        let vault = IdentityVault::create_new(id)?;
        self.store.create(&vault)?;
        Ok(vault)
    }

    /// Deletes vault `id`. Deleting the active vault clears the selection.
    ///
    /// # Errors
    /// Returns [`StorageError::NotFound`] if the vault does not exist.
    pub fn delete_vault(&self, id: &str) -> StorageResult<()> {
        let id = parse_id(id)?;
        if !self.store.delete(&id)? {
            return Err(StorageError::not_found(format!("vault {id}")));
        }
        if self.context.active_vault_id().as_ref() == Some(&id) {
            self.context.set_active_vault(None);
        }
        Ok(())
    }

    /// Reads vault `id`.
    ///
    /// # Errors
    /// Returns [`StorageError::NotFound`] if the vault does not exist.
    pub fn get_vault(&self, id: &str) -> StorageResult<IdentityVault> {
        let id = parse_id(id)?;
        self.store
            .get(&id)?
            .ok_or_else(|| StorageError::not_found(format!("vault {id}")))
    }

    /// Replaces the stored document of `vault`.
    ///
    /// # Errors
    /// Returns [`StorageError::NotFound`] if the vault does not exist.
    pub fn update_vault(&self, vault: &IdentityVault) -> StorageResult<()> {
        self.store.update(vault)
    }

    /// Every stored vault, ordered by id.
    ///
    /// # Errors
    /// Returns the first read or parse error.
    pub fn list_vaults(&self) -> StorageResult<Vec<IdentityVault>> {
        self.store.list()
    }
}

fn parse_id(id: &str) -> StorageResult<VaultId> {
    VaultId::create(id).map_err(|err| StorageError::Vault(err.into()))
}
