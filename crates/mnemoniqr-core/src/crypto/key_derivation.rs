//! Password-based key derivation using PBKDF2-HMAC-SHA-256
//!
//! 64 bytes are derived per call and split into two disjoint keys:
//! bytes `0..32` become the cipher key, bytes `32..64` the MAC key.

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use super::{KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
use crate::error::{Result, VaultError};

/// Bytes of PBKDF2 output per call: cipher key followed by MAC key
pub const DERIVED_LEN: usize = KEY_LEN * 2;

/// Cipher key and MAC key split from one PBKDF2 output, zeroed on drop
pub struct DerivedKeys {
    cipher_key: Zeroizing<[u8; KEY_LEN]>,
    mac_key: Zeroizing<[u8; KEY_LEN]>,
}

impl DerivedKeys {
    /// Split derived material: bytes `0..32` key AES-GCM, bytes `32..64` key HMAC
    pub fn from_material(material: &[u8; DERIVED_LEN]) -> Self {
        let mut cipher_key = Zeroizing::new([0u8; KEY_LEN]);
        let mut mac_key = Zeroizing::new([0u8; KEY_LEN]);
        cipher_key.copy_from_slice(&material[..KEY_LEN]);
        mac_key.copy_from_slice(&material[KEY_LEN..]);

        Self {
            cipher_key,
            mac_key,
        }
    }

    /// AES-256-GCM key
    pub fn cipher_key(&self) -> &[u8; KEY_LEN] {
        &self.cipher_key
    }

    /// HMAC-SHA-256 key
    pub fn mac_key(&self) -> &[u8; KEY_LEN] {
        &self.mac_key
    }
}

impl std::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKeys").finish_non_exhaustive()
    }
}

/// Generate a cryptographically secure random salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive the cipher key and MAC key from a passphrase and salt
///
/// Always runs the full [`PBKDF2_ITERATIONS`] work factor; keys are never
/// cached between calls.
pub fn derive_keys(passphrase: &str, salt: &[u8; SALT_LEN]) -> Result<DerivedKeys> {
    derive_keys_with_iterations(passphrase, salt, PBKDF2_ITERATIONS)
}

pub(crate) fn derive_keys_with_iterations(
    passphrase: &str,
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<DerivedKeys> {
    if iterations == 0 {
        return Err(VaultError::KeyDerivation(
            "iteration count must be positive".to_string(),
        ));
    }

    debug!(iterations, "deriving cipher and MAC keys");

    let mut material = Zeroizing::new([0u8; DERIVED_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut material[..]);

    Ok(DerivedKeys::from_material(&material))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn test_generate_salt() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();

        assert_eq!(salt1.len(), 32);
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn test_derive_keys_deterministic() {
        let salt = generate_salt();

        let keys1 = derive_keys_with_iterations("correct horse battery", &salt, FAST).unwrap();
        let keys2 = derive_keys_with_iterations("correct horse battery", &salt, FAST).unwrap();

        assert_eq!(keys1.cipher_key(), keys2.cipher_key());
        assert_eq!(keys1.mac_key(), keys2.mac_key());
    }

    #[test]
    fn test_cipher_and_mac_keys_differ() {
        let keys = derive_keys_with_iterations("correct horse battery", &generate_salt(), FAST)
            .unwrap();
        assert_ne!(keys.cipher_key(), keys.mac_key());
    }

    #[test]
    fn test_derive_keys_different_passphrases() {
        let salt = generate_salt();

        let keys1 = derive_keys_with_iterations("passphrase-one", &salt, FAST).unwrap();
        let keys2 = derive_keys_with_iterations("passphrase-two", &salt, FAST).unwrap();

        assert_ne!(keys1.cipher_key(), keys2.cipher_key());
        assert_ne!(keys1.mac_key(), keys2.mac_key());
    }

    #[test]
    fn test_derive_keys_different_salts() {
        let keys1 = derive_keys_with_iterations("passphrase", &generate_salt(), FAST).unwrap();
        let keys2 = derive_keys_with_iterations("passphrase", &generate_salt(), FAST).unwrap();

        assert_ne!(keys1.cipher_key(), keys2.cipher_key());
    }

    #[test]
    fn test_split_matches_contiguous_output() {
        let salt = [9u8; SALT_LEN];
        let keys = derive_keys_with_iterations("split check", &salt, FAST).unwrap();

        let mut expected = [0u8; DERIVED_LEN];
        pbkdf2_hmac::<Sha256>(b"split check", &salt, FAST, &mut expected);

        assert_eq!(keys.cipher_key(), &expected[..32]);
        assert_eq!(keys.mac_key(), &expected[32..]);
    }

    #[test]
    fn test_from_material_halves() {
        let mut material = [0u8; DERIVED_LEN];
        material[KEY_LEN..].fill(0xAB);

        let keys = DerivedKeys::from_material(&material);
        assert_eq!(keys.cipher_key(), &[0u8; KEY_LEN]);
        assert_eq!(keys.mac_key(), &[0xABu8; KEY_LEN]);
        assert_eq!(format!("{:?}", keys), "DerivedKeys { .. }");
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = derive_keys_with_iterations("passphrase", &generate_salt(), 0);
        assert!(matches!(result, Err(VaultError::KeyDerivation(_))));
    }
}
