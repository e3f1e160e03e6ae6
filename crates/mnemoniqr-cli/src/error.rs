//! Error types for the command-line front end

use mnemoniqr_core::VaultError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("Passphrases do not match")]
    PassphraseMismatch,

    #[error("No input provided: {0}")]
    MissingInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
