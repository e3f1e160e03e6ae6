//! Error types for mnemoniqr-core

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Missing input: {0}")]
    Validation(String),

    #[error("Weak passphrase: {0}")]
    WeakPassphrase(String),

    #[error("Invalid seed phrase: {0}")]
    InvalidSeedPhrase(String),

    #[error("Malformed encrypted data: {0}")]
    MalformedBlob(String),

    /// Raised for both a wrong passphrase and altered data; the two cases
    /// must not be told apart.
    #[error("Authentication failed - wrong passphrase or corrupted data")]
    Authentication,

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl VaultError {
    /// Whether this error means the blob could not be opened with the given
    /// passphrase (as opposed to bad input or an environment failure)
    pub fn is_rejection(&self) -> bool {
        matches!(self, VaultError::Authentication | VaultError::Decryption(_))
    }
}

impl From<tokio::task::JoinError> for VaultError {
    fn from(e: tokio::task::JoinError) -> Self {
        VaultError::Task(e.to_string())
    }
}
