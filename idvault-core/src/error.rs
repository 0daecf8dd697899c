//! Error types for the vault data model and its storage collaborators.

use thiserror::Error;

use crate::vault::IntegrityReport;

/// Result type for vault construction, serialization and diagnostics.
pub type VaultResult<T> = Result<T, VaultError>;

/// Result type for stores, filesystems and the vault router.
pub type StorageResult<T> = Result<T, StorageError>;

/// Reasons a raw string is rejected as a [`crate::VaultId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultIdError {
    /// The identifier was the empty string.
    #[error("Vault ID cannot be empty")]
    Empty,
    /// The identifier contains a character outside `[A-Za-z0-9_-]`.
    #[error(
        "Only alphanumeric characters, numbers, dashes, and underscores are allowed in vault ID"
    )]
    InvalidCharacters,
    /// The identifier is shorter than 2 or longer than 64 characters.
    #[error("Vault ID must be between 2 and 64 characters (got {len})")]
    LengthOutOfRange {
        /// Length of the rejected identifier.
        len: usize,
    },
}

/// Errors raised by the [`crate::IdentityVault`] aggregate.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The vault id failed validation.
    #[error("Invalid vault ID: {0}")]
    InvalidVaultId(#[from] VaultIdError),

    /// Input handed to `from_json` is not valid JSON or not a vault document.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The vault could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// One or more integrity checks failed; every violation is listed.
    #[error("Vault integrity check failed: {0}")]
    Integrity(IntegrityReport),

    /// No handler is registered for the named operation.
    #[error("unknown vault operation: {0}")]
    UnknownOperation(String),

    /// A registered operation rejected its arguments.
    #[error("vault operation failed: {0}")]
    Operation(String),
}

impl VaultError {
    /// Creates an invalid JSON error.
    pub fn invalid_json<S: Into<String>>(message: S) -> Self {
        Self::InvalidJson(message.into())
    }

    /// Creates an operation error.
    pub fn operation<S: Into<String>>(message: S) -> Self {
        Self::Operation(message.into())
    }
}

/// Errors raised by entity stores, filesystems and the dynamic vault router.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A vault-scoped operation ran while no vault was active.
    #[error("No active vault selected. Set an active vault on the context first.")]
    NoActiveVault,

    /// An I/O operation failed.
    #[error("I/O error during {context}: {source}")]
    Io {
        /// Context describing the operation.
        context: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The requested item or file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An item with the same id is already stored.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Serialization or deserialization of a stored record failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A routed path tried to leave the vault directory.
    #[error("invalid vault path: {0}")]
    InvalidPath(String),

    /// A store lock was poisoned.
    #[error("lock error: {0}")]
    Lock(String),

    /// The vault aggregate rejected data loaded from storage.
    #[error(transparent)]
    Vault(#[from] VaultError),
}

impl StorageError {
    /// Creates an I/O error with context.
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a not found error.
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a lock error.
    pub fn lock<S: Into<String>>(message: S) -> Self {
        Self::Lock(message.into())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
