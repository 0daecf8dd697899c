//! Entity stores and the paths they live under.
//!
//! [`EntityStore`] is the keyed collection interface; [`MemoryStore`] and
//! [`FileStore`] implement it. [`StorageAdapters`] bundles one store per
//! adapter record kind and moves [`crate::AdapterData`] in and out of them.
//!
//! [`VaultStore`] keeps whole vault documents, one directory per vault, and
//! [`VaultOperator`] drives their lifecycle on a [`crate::VaultContext`].

mod adapters;
mod file;
mod memory;
mod paths;
mod store;
mod vaults;

pub use adapters::StorageAdapters;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use paths::{RecordKind, VaultPaths};
pub use store::EntityStore;
pub use vaults::{VaultOperator, VaultStore, VAULT_DOCUMENT_MODE};
