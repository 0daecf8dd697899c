//! Persisting a vault's adapter records through entity stores.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;

use crate::adapters::AdapterData;
use crate::context::VaultContext;
use crate::error::StorageResult;
use crate::events::VaultEvent;
use crate::filesystem::FileSystem;
use crate::options::VaultOptions;
use crate::types::{Identifier, Key, ManagedPrivateKey, VerifiableCredential};
use crate::vault::IdentityVault;
use crate::vault_id::VaultId;

use super::{EntityStore, FileStore, MemoryStore, RecordKind};

/// The four adapter-backed stores of a vault.
///
/// [`StorageAdapters::save`] writes every record of an [`AdapterData`],
/// replacing records with the same key, and [`StorageAdapters::load`] reads
/// them back keyed by each item's natural key. With a [`VaultContext`]
/// attached, every saved record emits the matching `did.changed`,
/// `key.changed` or `vc.changed` event for the active vault.
pub struct StorageAdapters {
    dids: Box<dyn EntityStore<Identifier>>,
    keys: Box<dyn EntityStore<Key>>,
    private_keys: Box<dyn EntityStore<ManagedPrivateKey>>,
    vcs: Box<dyn EntityStore<VerifiableCredential>>,
    context: Option<VaultContext>,
}

impl StorageAdapters {
    /// Bundles four stores.
    #[must_use]
    pub fn new(
        dids: Box<dyn EntityStore<Identifier>>,
        keys: Box<dyn EntityStore<Key>>,
        private_keys: Box<dyn EntityStore<ManagedPrivateKey>>,
        vcs: Box<dyn EntityStore<VerifiableCredential>>,
    ) -> Self {
        Self {
            dids,
            keys,
            private_keys,
            vcs,
            context: None,
        }
    }

    /// Four empty [`MemoryStore`]s.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryStore::<Identifier>::new()),
            Box::new(MemoryStore::<Key>::new()),
            Box::new(MemoryStore::<ManagedPrivateKey>::new()),
            Box::new(MemoryStore::<VerifiableCredential>::new()),
        )
    }

    /// Four [`FileStore`]s sharing `fs`, one per [`RecordKind`] directory
    /// below `root`.
    ///
    /// With a [`crate::DynamicVaultFilesystem`] as `fs` and an empty `root`,
    /// the records land in the active vault's directory.
    #[must_use]
    pub fn in_directory<F>(fs: &F, root: impl AsRef<Path>) -> Self
    where
        F: FileSystem + Clone + 'static,
    {
        let root = root.as_ref();
        Self::new(
            Box::new(FileStore::new(fs.clone(), root.join(RecordKind::Dids.dir_name()))),
            Box::new(FileStore::new(fs.clone(), root.join(RecordKind::Keys.dir_name()))),
            Box::new(FileStore::new(
                fs.clone(),
                root.join(RecordKind::PrivateKeys.dir_name()),
            )),
            Box::new(FileStore::new(fs.clone(), root.join(RecordKind::Vcs.dir_name()))),
        )
    }

    /// Emits record change events on `context` from now on.
    #[must_use]
    pub fn with_context(mut self, context: VaultContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Makes the stores hold exactly the records in `data`.
    ///
    /// Records with a key absent from `data` are deleted, the rest are
    /// created or replaced. Every deleted or written record emits its change
    /// event.
    ///
    /// # Errors
    /// Returns the first store error; changes made before it remain.
    pub fn save(&self, data: &AdapterData) -> StorageResult<()> {
        sync(&*self.dids, &data.dids, |did| {
            self.notify(|vault_id| VaultEvent::DidChanged {
                did: did.to_string(),
                vault_id,
            });
        })?;
        sync(&*self.keys, &data.keys, |public_key_hex| {
            self.notify(|vault_id| VaultEvent::KeyChanged {
                key_id: public_key_hex.to_string(),
                vault_id,
            });
        })?;
        sync(&*self.private_keys, &data.private_keys, |alias| {
            self.notify(|vault_id| VaultEvent::KeyChanged {
                key_id: alias.to_string(),
                vault_id,
            });
        })?;
        sync(&*self.vcs, &data.vcs, |id| {
            self.notify(|vault_id| VaultEvent::VcChanged {
                vc_id: id.to_string(),
                vault_id,
            });
        })?;
        log::debug!("saved {} adapter record(s)", data.len());
        Ok(())
    }

    /// Reads every record back, keyed by natural key in store list order.
    ///
    /// # Errors
    /// Returns the first store error.
    pub fn load(&self) -> StorageResult<AdapterData> {
        let mut data = AdapterData::default();
        for identifier in self.dids.list()? {
            data.dids.insert(identifier.did.clone(), identifier);
        }
        for key in self.keys.list()? {
            data.keys.insert(key.public_key_hex.clone(), key);
        }
        for private_key in self.private_keys.list()? {
            data.private_keys
                .insert(private_key.alias.clone(), private_key);
        }
        for vc in self.vcs.list()? {
            data.vcs.insert(vc.id.clone(), vc);
        }
        Ok(data)
    }

    /// Saves `vault.to_adapters()`.
    ///
    /// # Errors
    /// Returns the first store error.
    pub fn save_vault(&self, vault: &IdentityVault) -> StorageResult<()> {
        self.save(&vault.to_adapters())
    }

    /// Loads every record and rebuilds vault `vault_id` from them.
    ///
    /// # Errors
    /// Returns a store error, or [`crate::StorageError::Vault`] if `vault_id`
    /// is invalid.
    pub fn load_vault(
        &self,
        vault_id: &str,
        options: Option<VaultOptions>,
    ) -> StorageResult<IdentityVault> {
        let data = self.load()?;
        Ok(IdentityVault::from_adapters(vault_id, data, options)?)
    }

    fn notify(&self, event: impl FnOnce(VaultId) -> VaultEvent) {
        if let Some(context) = &self.context {
            if let Some(vault_id) = context.active_vault_id() {
                context.emit(&event(vault_id));
            }
        }
    }
}

/// Deletes stored ids missing from `records`, then puts every record.
fn sync<T>(
    store: &dyn EntityStore<T>,
    records: &IndexMap<String, T>,
    changed: impl Fn(&str),
) -> StorageResult<()> {
    for id in store.ids()? {
        if !records.contains_key(&id) {
            store.delete(&id)?;
            changed(&id);
        }
    }
    for (id, item) in records {
        store.put(id, item)?;
        changed(id);
    }
    Ok(())
}

impl fmt::Debug for StorageAdapters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAdapters")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
