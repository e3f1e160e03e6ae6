//! Cryptographic primitives for sealing seed phrases
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA-256 key derivation into a cipher key and a MAC key
//! - AES-256-GCM encryption with a 16-byte IV
//! - HMAC-SHA-256 authentication tags with constant-time verification
//! - Derived keys held in zeroizing buffers

mod encryption;
mod key_derivation;

pub use encryption::{compute_tag, decrypt, encrypt, generate_iv, verify_tag};
pub use key_derivation::{derive_keys, generate_salt, DerivedKeys, DERIVED_LEN};
pub(crate) use key_derivation::derive_keys_with_iterations;

/// Length of each derived key in bytes (256 bits)
pub const KEY_LEN: usize = 32;

/// PBKDF2 work factor
pub const PBKDF2_ITERATIONS: u32 = 310_000;

/// Per-encryption random salt length in bytes
pub const SALT_LEN: usize = 32;

/// AES-GCM IV length in bytes
pub const IV_LEN: usize = 16;

/// HMAC-SHA-256 tag length in bytes
pub const TAG_LEN: usize = 32;

/// Tag appended by AES-GCM to its ciphertext
pub const GCM_TAG_LEN: usize = 16;
