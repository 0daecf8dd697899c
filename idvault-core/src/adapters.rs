//! Conversion between a vault's list-shaped stores and keyed storage records.
//!
//! [`AdapterData`] is a derived view of a vault, produced on demand for
//! persistence and discarded afterwards. Each mapping is keyed by the natural
//! identifier of its items:
//!
//! | mapping       | key                              |
//! |---------------|----------------------------------|
//! | `dids`        | [`Identifier::did`]              |
//! | `keys`        | [`Key::public_key_hex`]          |
//! | `privateKeys` | [`ManagedPrivateKey::alias`]     |
//! | `vcs`         | [`VerifiableCredential::id`]     |
//!
//! Duplicate keys: the later list item wins. Its value replaces the earlier
//! one in place, so the key keeps the position of its first occurrence. A
//! warning is logged for every collapsed item.
//!
//! WireGuard keys and the primary identity have no adapter mapping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::VaultResult;
use crate::options::VaultOptions;
use crate::types::{Identifier, Key, ManagedPrivateKey, VerifiableCredential};
use crate::vault::{IdentityVault, StoreKind, VaultProps};

/// Keyed, insertion-ordered records for each adapter-backed store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdapterData {
    /// DIDs keyed by DID string.
    pub dids: IndexMap<String, Identifier>,
    /// Public keys keyed by public key hex.
    pub keys: IndexMap<String, Key>,
    /// Private keys keyed by alias.
    pub private_keys: IndexMap<String, ManagedPrivateKey>,
    /// Credentials keyed by credential id.
    pub vcs: IndexMap<String, VerifiableCredential>,
}

impl AdapterData {
    /// Total number of records across all mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dids.len() + self.keys.len() + self.private_keys.len() + self.vcs.len()
    }

    /// Returns `true` if every mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityVault {
    /// Folds each adapter-backed store into a keyed mapping.
    ///
    /// Keys are the DID, the public key hex, the private key alias and the
    /// credential id. A later item with an already seen key replaces the
    /// earlier value in place.
    #[must_use]
    pub fn to_adapters(&self) -> AdapterData {
        AdapterData {
            dids: key_by(self.did_store(), StoreKind::DidStore, |d| &d.did),
            keys: key_by(self.key_store(), StoreKind::KeyStore, |k| &k.public_key_hex),
            private_keys: key_by(self.private_key_store(), StoreKind::PrivateKeyStore, |pk| {
                &pk.alias
            }),
            vcs: key_by(self.vc_store(), StoreKind::VcStore, |vc| &vc.id),
        }
    }

    /// Rebuilds a vault from keyed records.
    ///
    /// Each mapping's values become a store list in the mapping's iteration
    /// order. The identity and WireGuard keys start empty, `created_at` is now.
    ///
    /// # Errors
    /// Returns [`crate::VaultError::InvalidVaultId`] if `vault_id` is invalid.
    pub fn from_adapters(
        vault_id: &str,
        data: AdapterData,
        options: Option<VaultOptions>,
    ) -> VaultResult<Self> {
        let props = VaultProps {
            id: vault_id.to_string(),
            did_store: Some(data.dids.into_values().collect()),
            key_store: Some(data.keys.into_values().collect()),
            private_key_store: Some(data.private_keys.into_values().collect()),
            vc_store: Some(data.vcs.into_values().collect()),
            options,
            ..VaultProps::default()
        };
        Self::create(props)
    }
}

fn key_by<T, F>(items: &[T], store: StoreKind, key: F) -> IndexMap<String, T>
where
    T: Clone,
    F: Fn(&T) -> &String,
{
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        let k = key(item);
        if map.insert(k.clone(), item.clone()).is_some() {
            log::warn!("{store}: duplicate key {k:?}, keeping the later item");
        }
    }
    map
}
