//! Storage path helpers.

use std::path::{Path, PathBuf};

use strum::{Display, EnumIter, EnumString};

use crate::vault_id::VaultId;

const DOCUMENT_FILENAME: &str = "vault.json";

/// The adapter-backed record kinds, one store directory each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum RecordKind {
    /// `dids/`
    Dids,
    /// `keys/`
    Keys,
    /// `private-keys/`
    PrivateKeys,
    /// `vcs/`
    Vcs,
}

impl RecordKind {
    /// Store directory name, relative to a vault directory.
    #[must_use]
    pub fn dir_name(self) -> String {
        self.to_string()
    }
}

/// Paths for vault artifacts under a base directory.
///
/// ```text
/// <root>/<vault id>/vault.json
/// <root>/<vault id>/{dids,keys,private-keys,vcs}/<sha-256 of id, hex>.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    root: PathBuf,
}

impl VaultPaths {
    /// Builds vault paths rooted at `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory of vault `id`.
    #[must_use]
    pub fn vault_dir(&self, id: &VaultId) -> PathBuf {
        self.root.join(id.value())
    }

    /// Returns the path of vault `id`'s JSON document.
    #[must_use]
    pub fn document_path(&self, id: &VaultId) -> PathBuf {
        self.vault_dir(id).join(DOCUMENT_FILENAME)
    }

    /// Returns the store directory for `kind` inside vault `id`.
    #[must_use]
    pub fn store_dir(&self, id: &VaultId, kind: RecordKind) -> PathBuf {
        self.vault_dir(id).join(kind.dir_name())
    }

    /// The document file name, relative to a vault directory.
    #[must_use]
    pub fn document_file_name() -> &'static Path {
        Path::new(DOCUMENT_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use strum::IntoEnumIterator;

    use super::{RecordKind, VaultPaths};
    use crate::vault_id::VaultId;

    #[test]
    fn test_vault_paths() {
        let root = PathBuf::from("/tmp/idvault-paths");
        let paths = VaultPaths::new(&root);
        let id = VaultId::create("vault-a").unwrap();
        let vault_dir = root.join("vault-a");

        assert_eq!(paths.root(), root);
        assert_eq!(paths.vault_dir(&id), vault_dir);
        assert_eq!(paths.document_path(&id), vault_dir.join("vault.json"));
        assert_eq!(
            paths.store_dir(&id, RecordKind::PrivateKeys),
            vault_dir.join("private-keys")
        );
    }

    #[test]
    fn test_record_kind_dir_names() {
        let names: Vec<_> = RecordKind::iter().map(RecordKind::dir_name).collect();
        assert_eq!(names, vec!["dids", "keys", "private-keys", "vcs"]);
        assert_eq!("vcs".parse::<RecordKind>().unwrap(), RecordKind::Vcs);
    }
}
