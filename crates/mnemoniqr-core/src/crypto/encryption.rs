//! AES-256-GCM encryption plus an independent HMAC-SHA-256 over the ciphertext
//!
//! The GCM mode runs with a 16-byte IV and a 128-bit internal tag, which is
//! appended to the ciphertext. A separately keyed HMAC is then computed over
//! that ciphertext so authenticity is checked twice on the way back in:
//! explicitly by [`verify_tag`] before any decryption, then implicitly by GCM.

use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit},
    aes::Aes256,
    AesGcm, Nonce,
};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

use super::{IV_LEN, KEY_LEN, TAG_LEN};
use crate::error::{Result, VaultError};

/// AES-256-GCM with a 128-bit nonce
type Aes256Gcm16 = AesGcm<Aes256, U16>;

type HmacSha256 = Hmac<Sha256>;

/// Generate a random IV (16 bytes)
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypt plaintext using AES-256-GCM
///
/// # Returns
/// The ciphertext with the 16-byte GCM tag appended
pub fn encrypt(plaintext: &[u8], key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm16::new_from_slice(key)
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    cipher
        .encrypt(Nonce::<U16>::from_slice(iv), plaintext)
        .map_err(|e| VaultError::Encryption(e.to_string()))
}

/// Decrypt ciphertext (with its GCM tag appended) using AES-256-GCM
pub fn decrypt(ciphertext: &[u8], key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm16::new_from_slice(key)
        .map_err(|e| VaultError::Decryption(e.to_string()))?;

    cipher
        .decrypt(Nonce::<U16>::from_slice(iv), ciphertext)
        .map_err(|_| VaultError::Decryption("cipher integrity check failed".to_string()))
}

/// Compute the HMAC-SHA-256 authentication tag over a ciphertext
pub fn compute_tag(key: &[u8; KEY_LEN], ciphertext: &[u8]) -> Result<[u8; TAG_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| VaultError::Encryption(e.to_string()))?;
    mac.update(ciphertext);

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Verify an authentication tag in constant time
///
/// Fails with [`VaultError::Authentication`] on any mismatch.
pub fn verify_tag(key: &[u8; KEY_LEN], ciphertext: &[u8], tag: &[u8]) -> Result<()> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| VaultError::Decryption(e.to_string()))?;
    mac.update(ciphertext);
    mac.verify_slice(tag).map_err(|_| VaultError::Authentication)
}
