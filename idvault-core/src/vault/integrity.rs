//! Integrity checks over a vault's stores.

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use super::IdentityVault;

const DID_PREFIX: &str = "did:";

/// The list-shaped stores of a vault.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum StoreKind {
    /// `didStore`
    DidStore,
    /// `keyStore`
    KeyStore,
    /// `privateKeyStore`
    PrivateKeyStore,
    /// `vcStore`
    VcStore,
    /// `wgKeyStore`
    WgKeyStore,
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityViolation {
    /// Store holding the offending item.
    pub store: StoreKind,
    /// Position of the item in its store.
    pub index: usize,
    /// The item's natural key, or `#<index>` when that key is empty.
    pub item: String,
    /// What is wrong.
    pub problem: String,
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.store, self.index, self.item, self.problem
        )
    }
}

/// Every violation found in one pass over a vault.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IntegrityReport {
    violations: Vec<IntegrityViolation>,
}

impl IntegrityReport {
    /// Checks every store of `vault`.
    #[must_use]
    pub fn check(vault: &IdentityVault) -> Self {
        let mut report = Self::default();

        for (index, did) in vault.did_store().iter().enumerate() {
            if !did.did.starts_with(DID_PREFIX) {
                report.push(
                    StoreKind::DidStore,
                    index,
                    &did.did,
                    format!("DID \"{}\" does not start with \"{DID_PREFIX}\"", did.did),
                );
            }
        }

        for (index, key) in vault.key_store().iter().enumerate() {
            let missing = missing_fields(&[
                ("kid", &key.kid),
                ("publicKeyHex", &key.public_key_hex),
                ("type", &key.key_type),
            ]);
            if !missing.is_empty() {
                report.push(
                    StoreKind::KeyStore,
                    index,
                    &key.public_key_hex,
                    missing_message(&missing),
                );
            }
        }

        for (index, pk) in vault.private_key_store().iter().enumerate() {
            let missing = missing_fields(&[
                ("alias", &pk.alias),
                ("privateKeyHex", &pk.private_key_hex),
                ("type", &pk.key_type),
            ]);
            if !missing.is_empty() {
                report.push(
                    StoreKind::PrivateKeyStore,
                    index,
                    &pk.alias,
                    missing_message(&missing),
                );
            }
        }

        for (index, vc) in vault.vc_store().iter().enumerate() {
            let mut missing = Vec::new();
            if vc.id.is_empty() {
                missing.push("id");
            }
            if vc.credential_type.is_empty() {
                missing.push("type");
            }
            if vc.issuer.id().is_empty() {
                missing.push("issuer");
            }
            if !missing.is_empty() {
                report.push(StoreKind::VcStore, index, &vc.id, missing_message(&missing));
            }
        }

        report
    }

    fn push(&mut self, store: StoreKind, index: usize, item: &str, problem: String) {
        let item = if item.is_empty() {
            format!("#{index}")
        } else {
            item.to_string()
        };
        self.violations.push(IntegrityViolation {
            store,
            index,
            item,
            problem,
        });
    }

    /// Returns `true` if no check failed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations, in store order then item order.
    #[must_use]
    pub fn violations(&self) -> &[IntegrityViolation] {
        &self.violations
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if there are no violations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

fn missing_fields<'a>(fields: &[(&'a str, &String)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect()
}

fn missing_message(missing: &[&str]) -> String {
    format!("missing required field(s): {}", missing.join(", "))
}
