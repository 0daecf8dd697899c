//! Per-vault options.
//!
//! Every level carries `serde(default)` so a partially supplied options object
//! (in JSON or built in code with `..Default::default()`) is always completed
//! with the defaults: encryption disabled, `aes-256-gcm`, local private keys.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Cipher requested for encryption at rest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
pub enum EncryptionAlgorithm {
    /// AES-256 in Galois/Counter mode.
    #[default]
    #[strum(serialize = "aes-256-gcm")]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    /// ChaCha20 stream cipher with Poly1305 MAC.
    #[strum(serialize = "chacha20-poly1305")]
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

/// Where private keys live.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PrivateKeysStorage {
    /// In the vault's own private key store.
    #[default]
    Local,
    /// In an external key management service.
    Kms,
}

/// Encryption settings. No cipher is applied by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionOptions {
    /// Whether vault contents should be encrypted at rest.
    pub enabled: bool,
    /// Cipher to use when enabled.
    pub algorithm: EncryptionAlgorithm,
}

/// Options of an [`crate::IdentityVault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VaultOptions {
    /// Encryption settings.
    pub encryption: EncryptionOptions,
    /// Where private keys live.
    pub private_keys_storage: PrivateKeysStorage,
}

impl VaultOptions {
    /// Returns a copy with encryption enabled under `algorithm`.
    #[must_use]
    pub const fn with_encryption(mut self, algorithm: EncryptionAlgorithm) -> Self {
        self.encryption = EncryptionOptions {
            enabled: true,
            algorithm,
        };
        self
    }

    /// Returns a copy with private keys stored in `storage`.
    #[must_use]
    pub const fn with_private_keys_storage(mut self, storage: PrivateKeysStorage) -> Self {
        self.private_keys_storage = storage;
        self
    }
}
