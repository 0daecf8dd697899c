//! Validated vault identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VaultIdError;

/// Minimum vault id length in characters.
pub const VAULT_ID_MIN_LEN: usize = 2;
/// Maximum vault id length in characters.
pub const VAULT_ID_MAX_LEN: usize = 64;

/// Identifier of a vault.
///
/// Always non-empty, made only of `[A-Za-z0-9_-]`, and between
/// [`VAULT_ID_MIN_LEN`] and [`VAULT_ID_MAX_LEN`] characters long. The raw
/// string is stored as given; no trimming is performed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VaultId(String);

impl VaultId {
    /// Validates `raw` and wraps it.
    ///
    /// Checks run in order: emptiness, character class, then length.
    ///
    /// # Errors
    /// Returns [`VaultIdError::Empty`], [`VaultIdError::InvalidCharacters`] or
    /// [`VaultIdError::LengthOutOfRange`].
    pub fn create(raw: impl Into<String>) -> Result<Self, VaultIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(VaultIdError::Empty);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(VaultIdError::InvalidCharacters);
        }
        // all chars are ASCII at this point, so bytes == chars
        let len = raw.len();
        if !(VAULT_ID_MIN_LEN..=VAULT_ID_MAX_LEN).contains(&len) {
            return Err(VaultIdError::LengthOutOfRange { len });
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns the owned string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VaultId({})", self.0)
    }
}

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VaultId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for VaultId {
    type Err = VaultIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for VaultId {
    type Error = VaultIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl TryFrom<&str> for VaultId {
    type Error = VaultIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<VaultId> for String {
    fn from(id: VaultId) -> Self {
        id.0
    }
}
