//! Wire format for a sealed seed phrase
//!
//! Layout: `salt (32) || iv (16) || ciphertext (variable) || tag (32)`,
//! transported as standard padded base64 so it stays readable by browser
//! `atob` and fits in a QR code as plain text.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::crypto::{IV_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, VaultError};

/// Smallest valid blob: salt, IV and tag around an empty ciphertext
pub const MIN_BLOB_LEN: usize = SALT_LEN + IV_LEN + TAG_LEN;

/// Decoded encrypted blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// PBKDF2 salt
    pub salt: [u8; SALT_LEN],
    /// AES-GCM IV
    pub iv: [u8; IV_LEN],
    /// AES-GCM output, including its 16-byte tag
    pub ciphertext: Vec<u8>,
    /// HMAC-SHA-256 over `ciphertext`
    pub tag: [u8; TAG_LEN],
}

impl EncryptedBlob {
    /// Serialize to `salt || iv || ciphertext || tag`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        bytes.extend_from_slice(&self.tag);
        bytes
    }

    /// Parse from raw bytes, slicing by the fixed layout
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_BLOB_LEN {
            return Err(VaultError::MalformedBlob(format!(
                "expected at least {} bytes, got {}",
                MIN_BLOB_LEN,
                bytes.len()
            )));
        }

        let (salt_bytes, rest) = bytes.split_at(SALT_LEN);
        let (iv_bytes, rest) = rest.split_at(IV_LEN);
        let (ciphertext, tag_bytes) = rest.split_at(rest.len() - TAG_LEN);

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(salt_bytes);

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(iv_bytes);

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(tag_bytes);

        Ok(Self {
            salt,
            iv,
            ciphertext: ciphertext.to_vec(),
            tag,
        })
    }

    /// Encode as base64 text
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decode from base64 text
    ///
    /// Surrounding whitespace is ignored, as QR scanners often append a
    /// trailing newline.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| VaultError::MalformedBlob(format!("invalid base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Length of [`EncryptedBlob::to_bytes`] output, before base64
    pub fn encoded_len(&self) -> usize {
        MIN_BLOB_LEN + self.ciphertext.len()
    }
}
