//! The identity vault aggregate.
//!
//! An [`IdentityVault`] is an immutable snapshot of one identity's key and
//! credential material. It is built through [`IdentityVault::create_new`] or
//! [`IdentityVault::create`]; an "update" is a new vault created from the
//! previous one's [`IdentityVault::to_json`] record.
//!
//! # Serialization
//!
//! The canonical persisted shape is the flattened document:
//!
//! ```text
//! {
//!   "id": "<vault id>",
//!   "identity": { ... },            // omitted when absent
//!   "didStore": [ ... ],
//!   "keyStore": [ ... ],
//!   "privateKeyStore": [ ... ],
//!   "vcStore": [ ... ],
//!   "wgKeyStore": [ ... ],
//!   "options": { "encryption": { "enabled": false, "algorithm": "aes-256-gcm" },
//!                "privateKeysStorage": "local" },
//!   "createdAt": "2024-01-01T00:00:00Z"
//! }
//! ```
//!
//! `Display`, [`IdentityVault::to_json_string`], `serde::Serialize` and the
//! serialized form of [`IdentityVault::to_json`] all produce this document, and
//! [`IdentityVault::from_json`] accepts it.

mod integrity;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};
use crate::options::VaultOptions;
use crate::types::{
    Identifier, Identity, Key, ManagedPrivateKey, VerifiableCredential, WireGuardKey,
};
use crate::vault_id::VaultId;

pub use integrity::{IntegrityReport, IntegrityViolation, StoreKind};

/// Input record for [`IdentityVault::create`].
///
/// Only `id` is required. Missing stores become empty lists, missing options
/// become [`VaultOptions::default`], and a missing `created_at` becomes the
/// current time. The same record is what [`IdentityVault::to_json`] returns,
/// fully populated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultProps {
    /// Raw vault id, validated by `create`.
    pub id: String,
    /// Primary identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    /// Managed DIDs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_store: Option<Vec<Identifier>>,
    /// Public keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_store: Option<Vec<Key>>,
    /// Private keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_store: Option<Vec<ManagedPrivateKey>>,
    /// Verifiable credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_store: Option<Vec<VerifiableCredential>>,
    /// WireGuard keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wg_key_store: Option<Vec<WireGuardKey>>,
    /// Vault options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<VaultOptions>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl VaultProps {
    /// Starts a record for vault `id` with nothing else set.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the primary identity.
    #[must_use]
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Sets the DID store.
    #[must_use]
    pub fn dids(mut self, dids: Vec<Identifier>) -> Self {
        self.did_store = Some(dids);
        self
    }

    /// Sets the key store.
    #[must_use]
    pub fn keys(mut self, keys: Vec<Key>) -> Self {
        self.key_store = Some(keys);
        self
    }

    /// Sets the private key store.
    #[must_use]
    pub fn private_keys(mut self, private_keys: Vec<ManagedPrivateKey>) -> Self {
        self.private_key_store = Some(private_keys);
        self
    }

    /// Sets the credential store.
    #[must_use]
    pub fn vcs(mut self, vcs: Vec<VerifiableCredential>) -> Self {
        self.vc_store = Some(vcs);
        self
    }

    /// Sets the WireGuard key store.
    #[must_use]
    pub fn wg_keys(mut self, wg_keys: Vec<WireGuardKey>) -> Self {
        self.wg_key_store = Some(wg_keys);
        self
    }

    /// Sets the options.
    #[must_use]
    pub fn options(mut self, options: VaultOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Counts and size of a vault, as reported by [`IdentityVault::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStats {
    /// Number of DIDs.
    pub dids: usize,
    /// Number of public keys.
    pub keys: usize,
    /// Number of private keys.
    pub private_keys: usize,
    /// Number of credentials.
    pub vcs: usize,
    /// Number of WireGuard keys.
    pub wg_keys: usize,
    /// Whether a primary identity is set.
    pub has_identity: bool,
    /// Whether the vault holds nothing at all.
    pub is_empty: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Byte length of the canonical JSON document.
    pub size: usize,
}

/// One identity's DIDs, keys, private keys, credentials and WireGuard keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "VaultProps")]
pub struct IdentityVault {
    id: VaultId,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<Identity>,
    did_store: Vec<Identifier>,
    key_store: Vec<Key>,
    private_key_store: Vec<ManagedPrivateKey>,
    vc_store: Vec<VerifiableCredential>,
    wg_key_store: Vec<WireGuardKey>,
    options: VaultOptions,
    created_at: DateTime<Utc>,
}

impl IdentityVault {
    /// Creates an empty vault with default options, created now.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidVaultId`] if `id` is not a valid vault id.
    pub fn create_new(id: &str) -> VaultResult<Self> {
        let id = VaultId::create(id)?;
        Ok(Self {
            id,
            identity: None,
            did_store: Vec::new(),
            key_store: Vec::new(),
            private_key_store: Vec::new(),
            vc_store: Vec::new(),
            wg_key_store: Vec::new(),
            options: VaultOptions::default(),
            created_at: Utc::now(),
        })
    }

    /// Creates a vault from `props`, filling every missing field with its
    /// default. Store contents are taken as given.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidVaultId`] if `props.id` is not a valid vault id.
    pub fn create(props: VaultProps) -> VaultResult<Self> {
        let id = VaultId::create(props.id)?;
        Ok(Self {
            id,
            identity: props.identity,
            did_store: props.did_store.unwrap_or_default(),
            key_store: props.key_store.unwrap_or_default(),
            private_key_store: props.private_key_store.unwrap_or_default(),
            vc_store: props.vc_store.unwrap_or_default(),
            wg_key_store: props.wg_key_store.unwrap_or_default(),
            options: props.options.unwrap_or_default(),
            created_at: props.created_at.unwrap_or_else(Utc::now),
        })
    }

    /// Parses a vault document.
    ///
    /// Accepts the canonical document as well as any partial record `create`
    /// accepts (only `id` is required). `createdAt` is read as an RFC 3339
    /// timestamp.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidJson`] if `json` does not parse as a vault
    /// record, or [`VaultError::InvalidVaultId`] if its id is invalid.
    pub fn from_json(json: &str) -> VaultResult<Self> {
        let props: VaultProps =
            serde_json::from_str(json).map_err(|err| VaultError::invalid_json(err.to_string()))?;
        Self::create(props)
    }

    /// Returns the vault as a fully populated record.
    ///
    /// Serializing the record yields the canonical document, and passing it
    /// back to [`IdentityVault::create`] yields an equal vault.
    #[must_use]
    pub fn to_json(&self) -> VaultProps {
        VaultProps {
            id: self.id.to_string(),
            identity: self.identity.clone(),
            did_store: Some(self.did_store.clone()),
            key_store: Some(self.key_store.clone()),
            private_key_store: Some(self.private_key_store.clone()),
            vc_store: Some(self.vc_store.clone()),
            wg_key_store: Some(self.wg_key_store.clone()),
            options: Some(self.options),
            created_at: Some(self.created_at),
        }
    }

    /// Serializes the vault to its canonical JSON document.
    ///
    /// # Errors
    /// Returns [`VaultError::Serialization`] if an opaque field cannot be encoded.
    pub fn to_json_string(&self) -> VaultResult<String> {
        serde_json::to_string(self).map_err(|err| VaultError::Serialization(err.to_string()))
    }

    /// Serializes the vault to an indented JSON document.
    ///
    /// # Errors
    /// Returns [`VaultError::Serialization`] if an opaque field cannot be encoded.
    pub fn to_json_pretty(&self) -> VaultResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| VaultError::Serialization(err.to_string()))
    }

    /// The vault id.
    #[must_use]
    pub const fn id(&self) -> &VaultId {
        &self.id
    }

    /// The primary identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Managed DIDs.
    #[must_use]
    pub fn did_store(&self) -> &[Identifier] {
        &self.did_store
    }

    /// Public keys.
    #[must_use]
    pub fn key_store(&self) -> &[Key] {
        &self.key_store
    }

    /// Private keys.
    #[must_use]
    pub fn private_key_store(&self) -> &[ManagedPrivateKey] {
        &self.private_key_store
    }

    /// Verifiable credentials.
    #[must_use]
    pub fn vc_store(&self) -> &[VerifiableCredential] {
        &self.vc_store
    }

    /// WireGuard keys.
    #[must_use]
    pub fn wg_key_store(&self) -> &[WireGuardKey] {
        &self.wg_key_store
    }

    /// Vault options, always fully populated.
    #[must_use]
    pub const fn options(&self) -> &VaultOptions {
        &self.options
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` if every store is empty and no identity is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identity.is_none()
            && self.did_store.is_empty()
            && self.key_store.is_empty()
            && self.private_key_store.is_empty()
            && self.vc_store.is_empty()
            && self.wg_key_store.is_empty()
    }

    /// Byte length of the canonical JSON document.
    #[must_use]
    pub fn estimate_size(&self) -> usize {
        self.to_json_string().map_or(0, |json| json.len())
    }

    /// Counts, emptiness and size of the vault.
    #[must_use]
    pub fn stats(&self) -> VaultStats {
        VaultStats {
            dids: self.did_store.len(),
            keys: self.key_store.len(),
            private_keys: self.private_key_store.len(),
            vcs: self.vc_store.len(),
            wg_keys: self.wg_key_store.len(),
            has_identity: self.identity.is_some(),
            is_empty: self.is_empty(),
            created_at: self.created_at,
            size: self.estimate_size(),
        }
    }

    /// Returns the first credential whose id equals `id`.
    #[must_use]
    pub fn find_vc(&self, id: &str) -> Option<&VerifiableCredential> {
        self.vc_store.iter().find(|vc| vc.id == id)
    }

    /// Runs every integrity check and collects all violations.
    #[must_use]
    pub fn integrity_report(&self) -> IntegrityReport {
        IntegrityReport::check(self)
    }

    /// Checks that every DID starts with `did:` and that every key, private
    /// key and credential has its required fields.
    ///
    /// # Errors
    /// Returns [`VaultError::Integrity`] listing every violation found, not
    /// only the first.
    pub fn validate_integrity(&self) -> VaultResult<()> {
        let report = self.integrity_report();
        if report.is_ok() {
            Ok(())
        } else {
            Err(VaultError::Integrity(report))
        }
    }
}

impl TryFrom<VaultProps> for IdentityVault {
    type Error = VaultError;

    fn try_from(props: VaultProps) -> Result<Self, Self::Error> {
        Self::create(props)
    }
}

impl fmt::Display for IdentityVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json_string().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
