//! # mnemoniqr-core
//!
//! Core functionality for MnemoniQR, sealing wallet seed phrases into a
//! compact blob suitable for printing as a QR code:
//! - PBKDF2-HMAC-SHA-256 key derivation (310 000 iterations)
//! - AES-256-GCM encryption with a separately keyed HMAC-SHA-256 tag
//! - Fixed `salt || iv || ciphertext || tag` wire format, base64 encoded
//! - Passphrase strength policy and BIP-39 word hints
//! - Secrets zeroized on drop

pub mod blob;
pub mod crypto;
pub mod error;
pub mod passphrase;
pub mod seed_phrase;
pub mod settings;
mod vault;

pub use blob::{EncryptedBlob, MIN_BLOB_LEN};
pub use error::{Result, VaultError};
pub use passphrase::StrengthLevel;
pub use seed_phrase::{suggest, SeedPhrase};
pub use settings::{Settings, SettingsManager};
pub use vault::{RecoveredSeed, SeedVault, VaultPolicy};
