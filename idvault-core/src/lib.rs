//! Per-identity vault data model.
//!
//! An [`IdentityVault`] bundles the DIDs, public keys, private keys,
//! verifiable credentials and WireGuard keys of one identity under a
//! validated [`VaultId`]. Vaults are immutable values: build them with
//! [`IdentityVault::create_new`] or [`IdentityVault::create`], persist them as
//! a JSON document or as keyed [`AdapterData`] records, and rebuild them with
//! [`IdentityVault::from_json`] or [`IdentityVault::from_adapters`].
//!
//! Around the aggregate sit its storage collaborators: [`EntityStore`]
//! implementations, the [`FileSystem`] abstraction, and the
//! [`DynamicVaultFilesystem`] router, which scopes file access to the vault
//! that is active on a [`VaultContext`]. [`VaultOperator`] creates, selects,
//! lists and deletes whole vaults through a [`VaultStore`].
//!
//! Diagnostics go through the `log` facade; the host installs the logger.
//!
//! ```rust
//! use idvault_core::{Identifier, IdentityVault};
//!
//! let vault = IdentityVault::create_new("alice-main").unwrap();
//! let vault = IdentityVault::create(
//!     vault.to_json().dids(vec![Identifier::new("did:key:z6MkAlice")]),
//! )
//! .unwrap();
//!
//! assert!(vault.validate_integrity().is_ok());
//! assert_eq!(vault.to_adapters().dids.len(), 1);
//!
//! let restored = IdentityVault::from_json(&vault.to_string()).unwrap();
//! assert_eq!(restored, vault);
//! ```

mod error;
pub use error::*;

mod vault_id;
pub use vault_id::*;

mod types;
pub use types::*;

mod options;
pub use options::*;

mod vault;
pub use vault::*;

mod adapters;
pub use adapters::AdapterData;

mod events;
pub use events::*;

mod context;
pub use context::VaultContext;

mod filesystem;
pub use filesystem::*;

mod operations;
pub use operations::*;

pub mod storage;
pub use storage::{
    EntityStore, FileStore, MemoryStore, RecordKind, StorageAdapters, VaultOperator, VaultPaths,
    VaultStore, VAULT_DOCUMENT_MODE,
};

#[cfg(test)]
mod test_utils;
