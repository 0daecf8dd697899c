//! Identity material held by a vault.
//!
//! These are transfer structures for data owned by external identity and
//! credential tooling. Only the fields the vault reads (natural keys and the
//! fields checked by [`crate::IdentityVault::validate_integrity`]) are typed;
//! everything else is preserved verbatim in each struct's `extra` map so a
//! foreign document survives a load/save cycle unchanged.
//!
//! Typed fields default to empty when absent, so a document with incomplete
//! items still loads and the gaps surface as integrity violations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unknown fields carried alongside the typed ones.
pub type Extra = Map<String, Value>;

/// A managed decentralized identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// The DID string, e.g. `did:key:z6Mk...`. Natural key in adapter data.
    #[serde(default)]
    pub did: String,
    /// Local alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// DID method provider, e.g. `did:key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Key id of the controller key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_key_id: Option<String>,
    /// Public keys attached to the DID.
    #[serde(default)]
    pub keys: Vec<Key>,
    /// Service endpoints, kept opaque.
    #[serde(default)]
    pub services: Vec<Value>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Identifier {
    /// Creates an identifier with only its DID set.
    #[must_use]
    pub fn new(did: impl Into<String>) -> Self {
        Self {
            did: did.into(),
            alias: None,
            provider: None,
            controller_key_id: None,
            keys: Vec::new(),
            services: Vec::new(),
            extra: Extra::new(),
        }
    }
}

/// A public key managed by the key management system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    /// Key id.
    #[serde(default)]
    pub kid: String,
    /// Hex encoded public key. Natural key in adapter data.
    #[serde(default)]
    pub public_key_hex: String,
    /// Key type, e.g. `Ed25519`.
    #[serde(rename = "type", default)]
    pub key_type: String,
    /// Name of the key management system holding the private half.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms: Option<String>,
    /// Free-form key metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Key {
    /// Creates a key from its required fields.
    #[must_use]
    pub fn new(
        kid: impl Into<String>,
        public_key_hex: impl Into<String>,
        key_type: impl Into<String>,
    ) -> Self {
        Self {
            kid: kid.into(),
            public_key_hex: public_key_hex.into(),
            key_type: key_type.into(),
            kms: None,
            meta: None,
            extra: Extra::new(),
        }
    }
}

/// A private key stored in the vault.
///
/// Vault options may request encryption at rest, but the key material itself
/// is held as given.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedPrivateKey {
    /// Alias, conventionally the public key hex. Natural key in adapter data.
    #[serde(default)]
    pub alias: String,
    /// Hex encoded private key.
    #[serde(default)]
    pub private_key_hex: String,
    /// Key type, e.g. `Ed25519`.
    #[serde(rename = "type", default)]
    pub key_type: String,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl ManagedPrivateKey {
    /// Creates a private key record from its required fields.
    #[must_use]
    pub fn new(
        alias: impl Into<String>,
        private_key_hex: impl Into<String>,
        key_type: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            private_key_hex: private_key_hex.into(),
            key_type: key_type.into(),
            extra: Extra::new(),
        }
    }
}

impl std::fmt::Debug for ManagedPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedPrivateKey")
            .field("alias", &self.alias)
            .field("private_key_hex", &"<redacted>")
            .field("key_type", &self.key_type)
            .finish_non_exhaustive()
    }
}

/// `type` of a credential: either a single name or a list of names.
///
/// A credential without `type` gets an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialTypes {
    /// A single type name.
    One(String),
    /// A list of type names.
    Many(Vec<String>),
}

impl Default for CredentialTypes {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl CredentialTypes {
    /// Returns `true` if no non-empty type name is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(name) => name.is_empty(),
            Self::Many(names) => names.iter().all(String::is_empty),
        }
    }

    /// Returns `true` if `name` is one of the types.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::One(one) => one == name,
            Self::Many(names) => names.iter().any(|n| n == name),
        }
    }
}

/// Issuer of a credential: a bare DID or an object with an `id`.
///
/// A credential without `issuer` gets an empty bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Issuer {
    /// Bare issuer id.
    Id(String),
    /// Issuer object.
    Object {
        /// Issuer id.
        id: String,
        /// Any other fields.
        #[serde(flatten)]
        extra: Extra,
    },
}

impl Default for Issuer {
    fn default() -> Self {
        Self::Id(String::new())
    }
}

impl Issuer {
    /// Returns the issuer id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Object { id, .. } => id,
        }
    }
}

/// A verifiable credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    /// JSON-LD contexts.
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    /// Credential id, e.g. `urn:uuid:...`. Natural key in adapter data.
    #[serde(default)]
    pub id: String,
    /// Credential types.
    #[serde(rename = "type", default)]
    pub credential_type: CredentialTypes,
    /// Issuer.
    #[serde(default)]
    pub issuer: Issuer,
    /// Issuance date as given by the issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<String>,
    /// Subject claims, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_subject: Option<Value>,
    /// Proof, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Value>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl VerifiableCredential {
    /// Creates a credential from its required fields.
    #[must_use]
    pub fn new(id: impl Into<String>, credential_type: CredentialTypes, issuer: Issuer) -> Self {
        Self {
            context: None,
            id: id.into(),
            credential_type,
            issuer,
            issuance_date: None,
            credential_subject: None,
            proof: None,
            extra: Extra::new(),
        }
    }
}

/// A WireGuard key pair.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGuardKey {
    /// Base64 public key.
    pub public_key: String,
    /// Base64 private key, absent for peers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl std::fmt::Debug for WireGuardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireGuardKey")
            .field("public_key", &self.public_key)
            .field("has_private_key", &self.private_key.is_some())
            .finish_non_exhaustive()
    }
}

/// The primary identity bound to a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Local alias.
    pub alias: String,
    /// The identity's DID.
    pub did: String,
    /// Key id of the identity key.
    pub kid: String,
    /// Hex encoded public key of the identity key.
    pub public_key_hex: String,
    /// DID method provider, e.g. `did:key` or `did:web`.
    pub provider: String,
    /// Credential asserting the identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<VerifiableCredential>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Creation time of the identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_keeps_unknown_fields() {
        let raw = json!({
            "did": "did:key:z6Mkabc",
            "provider": "did:key",
            "controllerKeyId": "d68a",
            "keys": [],
            "services": [],
            "custom": {"nested": true}
        });
        let identifier: Identifier = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(identifier.did, "did:key:z6Mkabc");
        assert_eq!(identifier.controller_key_id.as_deref(), Some("d68a"));
        assert_eq!(identifier.extra.get("custom"), Some(&json!({"nested": true})));
        assert_eq!(serde_json::to_value(&identifier).unwrap(), raw);
    }

    #[test]
    fn test_credential_type_and_issuer_shapes() {
        let vc: VerifiableCredential = serde_json::from_value(json!({
            "id": "urn:uuid:1",
            "type": ["VerifiableCredential", "IdentityCredential"],
            "issuer": {"id": "did:key:issuer", "name": "Issuer"}
        }))
        .unwrap();
        assert!(vc.credential_type.contains("IdentityCredential"));
        assert_eq!(vc.issuer.id(), "did:key:issuer");

        let vc: VerifiableCredential = serde_json::from_value(json!({
            "id": "urn:uuid:2",
            "type": "VerifiableCredential",
            "issuer": "did:key:issuer"
        }))
        .unwrap();
        assert_eq!(vc.credential_type, CredentialTypes::One("VerifiableCredential".into()));
        assert_eq!(vc.issuer, Issuer::Id("did:key:issuer".into()));
    }

    #[test]
    fn test_absent_fields_default_to_empty() {
        let key: Key = serde_json::from_value(json!({"publicKeyHex": "ab"})).unwrap();
        assert!(key.kid.is_empty());
        assert!(key.key_type.is_empty());

        let vc: VerifiableCredential =
            serde_json::from_value(json!({"id": "urn:uuid:3"})).unwrap();
        assert!(vc.credential_type.is_empty());
        assert_eq!(vc.issuer.id(), "");

        let pk: ManagedPrivateKey = serde_json::from_value(json!({})).unwrap();
        assert!(pk.alias.is_empty());
        assert!(pk.private_key_hex.is_empty());
    }

    #[test]
    fn test_empty_credential_types() {
        assert!(CredentialTypes::One(String::new()).is_empty());
        assert!(CredentialTypes::Many(vec![]).is_empty());
        assert!(!CredentialTypes::Many(vec!["VerifiableCredential".into()]).is_empty());
    }

    #[test]
    fn test_private_material_is_redacted_in_debug() {
        let pk = ManagedPrivateKey::new("alias", "deadbeef", "Ed25519");
        assert!(!format!("{pk:?}").contains("deadbeef"));

        let wg = WireGuardKey {
            public_key: "pub".into(),
            private_key: Some("secret".into()),
            extra: Extra::new(),
        };
        assert!(!format!("{wg:?}").contains("secret"));
    }
}
