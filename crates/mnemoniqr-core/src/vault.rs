//! SeedVault: seal a seed phrase under a passphrase and open it again
//!
//! Each call is a single-shot transaction. Salt, IV and keys are created per
//! call and dropped (zeroized) when it returns; the vault itself only carries
//! the UX policy for input checks.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::blob::EncryptedBlob;
use crate::crypto::{
    self, derive_keys_with_iterations, generate_iv, generate_salt, PBKDF2_ITERATIONS,
};
use crate::error::{Result, VaultError};
use crate::passphrase::{self, DEFAULT_MIN_STRENGTH};
use crate::seed_phrase::SeedPhrase;
use crate::settings::Settings;

/// Input checks applied before encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultPolicy {
    /// Minimum passphrase strength score (0-100)
    pub min_strength: u8,
    /// Reject words outside the BIP-39 English word list
    pub validate_words: bool,
}

impl Default for VaultPolicy {
    fn default() -> Self {
        Self {
            min_strength: DEFAULT_MIN_STRENGTH,
            validate_words: true,
        }
    }
}

impl From<&Settings> for VaultPolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            min_strength: settings.min_passphrase_strength,
            validate_words: settings.validate_bip39_words,
        }
    }
}

/// Seed phrase recovered by [`SeedVault::decrypt`] - zeroed when dropped
pub struct RecoveredSeed(Zeroizing<String>);

impl RecoveredSeed {
    /// The recovered phrase (use carefully)
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Iterate over the words of the phrase
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// Number of words in the phrase
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Consume and return the inner value
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut *self.0)
    }
}

impl std::fmt::Debug for RecoveredSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveredSeed")
            .field("words", &self.word_count())
            .finish()
    }
}

/// Passphrase-based seed phrase encryption
#[derive(Debug, Clone)]
pub struct SeedVault {
    policy: VaultPolicy,
    iterations: u32,
}

impl Default for SeedVault {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedVault {
    /// Create a vault with the default policy
    pub fn new() -> Self {
        Self::with_policy(VaultPolicy::default())
    }

    /// Create a vault with a custom input policy
    pub fn with_policy(policy: VaultPolicy) -> Self {
        Self {
            policy,
            iterations: PBKDF2_ITERATIONS,
        }
    }

    /// Create a vault whose policy comes from user settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_policy(VaultPolicy::from(settings))
    }

    /// Reduced work factor for tests that do not exercise the KDF cost
    #[cfg(test)]
    pub(crate) fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Get the input policy
    pub fn policy(&self) -> VaultPolicy {
        self.policy
    }

    /// Encrypt a seed phrase and return the base64 blob
    ///
    /// Input checks run first; key derivation and encryption run on the
    /// blocking thread pool.
    pub async fn encrypt(&self, seed_phrase: &str, passphrase: &str) -> Result<String> {
        let phrase = self.check_inputs(seed_phrase, passphrase)?;
        let passphrase = Zeroizing::new(passphrase.to_string());
        let iterations = self.iterations;

        tokio::task::spawn_blocking(move || seal(&phrase, &passphrase, iterations))
            .await?
    }

    /// Blocking variant of [`SeedVault::encrypt`]
    pub fn encrypt_blocking(&self, seed_phrase: &str, passphrase: &str) -> Result<String> {
        let phrase = self.check_inputs(seed_phrase, passphrase)?;
        seal(&phrase, passphrase, self.iterations)
    }

    /// Decrypt a base64 blob back into the seed phrase
    ///
    /// The HMAC is verified before any decryption is attempted. Passphrase
    /// length and strength are not enforced here.
    pub async fn decrypt(&self, encrypted: &str, passphrase: &str) -> Result<RecoveredSeed> {
        let blob = EncryptedBlob::from_base64(encrypted)?;
        require_passphrase(passphrase)?;
        let passphrase = Zeroizing::new(passphrase.to_string());
        let iterations = self.iterations;

        tokio::task::spawn_blocking(move || open(&blob, &passphrase, iterations)).await?
    }

    /// Blocking variant of [`SeedVault::decrypt`]
    pub fn decrypt_blocking(&self, encrypted: &str, passphrase: &str) -> Result<RecoveredSeed> {
        let blob = EncryptedBlob::from_base64(encrypted)?;
        require_passphrase(passphrase)?;
        open(&blob, passphrase, self.iterations)
    }

    fn check_inputs(&self, seed_phrase: &str, passphrase: &str) -> Result<SeedPhrase> {
        if seed_phrase.trim().is_empty() {
            return Err(VaultError::Validation("seed phrase is required".to_string()));
        }
        require_passphrase(passphrase)?;

        passphrase::check(passphrase, self.policy.min_strength)?;

        let phrase = SeedPhrase::parse(seed_phrase)?;
        if self.policy.validate_words {
            phrase.check_words()?;
        }
        Ok(phrase)
    }
}

fn require_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(VaultError::Validation("passphrase is required".to_string()));
    }
    Ok(())
}

fn seal(phrase: &SeedPhrase, passphrase: &str, iterations: u32) -> Result<String> {
    debug!(words = phrase.word_count(), "sealing seed phrase");

    let salt = generate_salt();
    let iv = generate_iv();
    let keys = derive_keys_with_iterations(passphrase, &salt, iterations)?;

    let ciphertext = crypto::encrypt(phrase.as_str().as_bytes(), keys.cipher_key(), &iv)?;
    let tag = crypto::compute_tag(keys.mac_key(), &ciphertext)?;

    let blob = EncryptedBlob {
        salt,
        iv,
        ciphertext,
        tag,
    };
    debug!(bytes = blob.encoded_len(), "seed phrase sealed");
    Ok(blob.to_base64())
}

fn open(blob: &EncryptedBlob, passphrase: &str, iterations: u32) -> Result<RecoveredSeed> {
    debug!(bytes = blob.encoded_len(), "opening sealed seed phrase");

    let keys = derive_keys_with_iterations(passphrase, &blob.salt, iterations)?;

    if let Err(e) = crypto::verify_tag(keys.mac_key(), &blob.ciphertext, &blob.tag) {
        warn!("authentication tag mismatch");
        return Err(e);
    }

    let plaintext = crypto::decrypt(&blob.ciphertext, keys.cipher_key(), &blob.iv)?;
    let phrase = String::from_utf8(plaintext)
        .map_err(|e| VaultError::Decryption(format!("invalid UTF-8: {}", e.utf8_error())))?;

    Ok(RecoveredSeed(Zeroizing::new(phrase)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MIN_BLOB_LEN;
    use crate::crypto::{derive_keys, GCM_TAG_LEN};
    use base64::{engine::general_purpose::STANDARD, Engine};

    const SEED: &str =
        "abandon ability able about above absent absorb abstract absurd abuse access accident";
    const PASSPHRASE: &str = "Tr0ub4dor&3xample!";

    const CIPHERTEXT_OFFSET: usize = 48;

    fn fast_vault() -> SeedVault {
        SeedVault::new().with_iterations(1_000)
    }

    fn phrase_of(count: usize) -> String {
        SEED.split(' ').cycle().take(count).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn test_concrete_scenario_full_cost() {
        let vault = SeedVault::new();

        let blob = vault.encrypt(SEED, PASSPHRASE).await.unwrap();
        let recovered = vault.decrypt(&blob, PASSPHRASE).await.unwrap();
        assert_eq!(recovered.expose(), SEED);

        let result = vault.decrypt(&blob, "wrongpassword123456").await;
        assert!(matches!(result, Err(VaultError::Authentication)));
    }

    #[tokio::test]
    async fn test_full_cost_blob_opens_with_public_key_derivation() {
        let blob_text = SeedVault::new().encrypt(SEED, PASSPHRASE).await.unwrap();
        let blob = EncryptedBlob::from_base64(&blob_text).unwrap();

        // Keys derived through the public API must authenticate the blob
        let keys = derive_keys(PASSPHRASE, &blob.salt).unwrap();
        assert!(crypto::verify_tag(keys.mac_key(), &blob.ciphertext, &blob.tag).is_ok());
    }

    #[tokio::test]
    async fn test_roundtrip_all_word_counts() {
        let vault = fast_vault();
        for count in [12, 18, 24] {
            let seed = phrase_of(count);
            let blob = vault.encrypt(&seed, PASSPHRASE).await.unwrap();
            let recovered = vault.decrypt(&blob, PASSPHRASE).await.unwrap();

            assert_eq!(recovered.expose(), seed);
            assert_eq!(recovered.word_count(), count);
        }
    }

    #[tokio::test]
    async fn test_encrypt_normalizes_whitespace() {
        let vault = fast_vault();
        let messy = format!("  {}\n", SEED.replace(' ', "   "));

        let blob = vault.encrypt(&messy, PASSPHRASE).await.unwrap();
        assert_eq!(vault.decrypt(&blob, PASSPHRASE).await.unwrap().expose(), SEED);
    }

    #[tokio::test]
    async fn test_encryption_is_not_deterministic() {
        let vault = fast_vault();

        let blob1 = vault.encrypt(SEED, PASSPHRASE).await.unwrap();
        let blob2 = vault.encrypt(SEED, PASSPHRASE).await.unwrap();
        assert_ne!(blob1, blob2);

        let parsed1 = EncryptedBlob::from_base64(&blob1).unwrap();
        let parsed2 = EncryptedBlob::from_base64(&blob2).unwrap();
        assert_ne!(parsed1.salt, parsed2.salt);
        assert_ne!(parsed1.iv, parsed2.iv);

        assert_eq!(vault.decrypt(&blob1, PASSPHRASE).await.unwrap().expose(), SEED);
        assert_eq!(vault.decrypt(&blob2, PASSPHRASE).await.unwrap().expose(), SEED);
    }

    #[tokio::test]
    async fn test_length_invariant() {
        let vault = fast_vault();
        let blob = vault.encrypt(SEED, PASSPHRASE).await.unwrap();
        let bytes = STANDARD.decode(&blob).unwrap();

        assert!(bytes.len() >= MIN_BLOB_LEN);
        let parsed = EncryptedBlob::from_bytes(&bytes).unwrap();
        assert_eq!(bytes.len() - MIN_BLOB_LEN, parsed.ciphertext.len());
        assert_eq!(parsed.ciphertext.len(), SEED.len() + GCM_TAG_LEN);
    }

    #[tokio::test]
    async fn test_wrong_passphrase_rejected() {
        let vault = fast_vault();
        let blob = vault.encrypt(SEED, PASSPHRASE).await.unwrap();

        let result = vault.decrypt(&blob, "Tr0ub4dor&3xample?").await;
        assert!(matches!(result, Err(VaultError::Authentication)));
    }

    #[test]
    fn test_every_flipped_bit_rejected() {
        let vault = SeedVault::new().with_iterations(1);
        let blob = vault.encrypt_blocking(SEED, PASSPHRASE).unwrap();
        let bytes = STANDARD.decode(&blob).unwrap();

        for index in 0..bytes.len() {
            for bit in 0..8 {
                let mut tampered = bytes.clone();
                tampered[index] ^= 1 << bit;

                let result = vault.decrypt_blocking(&STANDARD.encode(&tampered), PASSPHRASE);
                let err = result.expect_err("tampered blob must not open");
                assert!(err.is_rejection(), "byte {} bit {} gave {:?}", index, bit, err);
            }
        }
    }

    #[test]
    fn test_flipped_ciphertext_or_tag_fails_authentication() {
        let vault = fast_vault();
        let blob = vault.encrypt_blocking(SEED, PASSPHRASE).unwrap();
        let bytes = STANDARD.decode(&blob).unwrap();

        for index in CIPHERTEXT_OFFSET..bytes.len() {
            let mut tampered = bytes.clone();
            tampered[index] ^= 0x01;

            let result = vault.decrypt_blocking(&STANDARD.encode(&tampered), PASSPHRASE);
            assert!(
                matches!(result, Err(VaultError::Authentication)),
                "byte {} gave {:?}",
                index,
                result
            );
        }
    }

    #[test]
    fn test_tampered_salt_or_iv_rejected() {
        let vault = fast_vault();
        let blob = vault.encrypt_blocking(SEED, PASSPHRASE).unwrap();
        let bytes = STANDARD.decode(&blob).unwrap();

        for index in [0, 31, 32, 47] {
            let mut tampered = bytes.clone();
            tampered[index] ^= 0x80;
            let result = vault.decrypt_blocking(&STANDARD.encode(&tampered), PASSPHRASE);
            assert!(result.unwrap_err().is_rejection());
        }
    }

    #[test]
    fn test_mac_checked_before_cipher() {
        let vault = fast_vault();
        let blob_text = vault.encrypt_blocking(SEED, PASSPHRASE).unwrap();
        let mut blob = EncryptedBlob::from_base64(&blob_text).unwrap();

        // Corrupt the GCM tag inside the ciphertext; the outer MAC catches it
        let last = blob.ciphertext.len() - 1;
        blob.ciphertext[last] ^= 0xFF;
        let result = vault.decrypt_blocking(&blob.to_base64(), PASSPHRASE);
        assert!(matches!(result, Err(VaultError::Authentication)));
    }

    #[test]
    fn test_cipher_check_still_enforced_when_mac_matches() {
        let vault = fast_vault();
        let blob_text = vault.encrypt_blocking(SEED, PASSPHRASE).unwrap();
        let mut blob = EncryptedBlob::from_base64(&blob_text).unwrap();

        // Re-tag altered ciphertext with the genuine MAC key
        let keys = derive_keys_with_iterations(PASSPHRASE, &blob.salt, 1_000).unwrap();
        blob.ciphertext[0] ^= 0x01;
        blob.tag = crypto::compute_tag(keys.mac_key(), &blob.ciphertext).unwrap();

        let result = vault.decrypt_blocking(&blob.to_base64(), PASSPHRASE);
        assert!(matches!(result, Err(VaultError::Decryption(_))));
    }

    #[tokio::test]
    async fn test_short_blobs_are_malformed() {
        let vault = fast_vault();

        let result = vault.decrypt("", PASSPHRASE).await;
        assert!(matches!(result, Err(VaultError::MalformedBlob(_))));

        let seventy = STANDARD.encode([0x5Au8; 70]);
        let result = vault.decrypt(&seventy, PASSPHRASE).await;
        assert!(matches!(result, Err(VaultError::MalformedBlob(_))));

        let result = vault.decrypt("%%%not-base64%%%", PASSPHRASE).await;
        assert!(matches!(result, Err(VaultError::MalformedBlob(_))));
    }

    #[tokio::test]
    async fn test_missing_inputs() {
        let vault = fast_vault();

        assert!(matches!(
            vault.encrypt("", PASSPHRASE).await,
            Err(VaultError::Validation(_))
        ));
        assert!(matches!(
            vault.encrypt(SEED, "").await,
            Err(VaultError::Validation(_))
        ));

        let blob = vault.encrypt(SEED, PASSPHRASE).await.unwrap();
        assert!(matches!(
            vault.decrypt(&blob, "").await,
            Err(VaultError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_weak_passphrases_rejected_before_derivation() {
        let vault = fast_vault();

        assert!(matches!(
            vault.encrypt(SEED, "Sh0rt!pass").await,
            Err(VaultError::WeakPassphrase(_))
        ));

        let strict = SeedVault::with_policy(VaultPolicy {
            min_strength: 90,
            validate_words: true,
        })
        .with_iterations(1_000);
        assert!(matches!(
            strict.encrypt(SEED, PASSPHRASE).await,
            Err(VaultError::WeakPassphrase(_))
        ));
    }

    #[tokio::test]
    async fn test_decrypt_does_not_enforce_strength() {
        let lenient = SeedVault::with_policy(VaultPolicy {
            min_strength: 0,
            validate_words: true,
        })
        .with_iterations(1_000);
        let blob = lenient.encrypt(SEED, "aaaaaaaaaaaa").await.unwrap();

        let strict = SeedVault::with_policy(VaultPolicy {
            min_strength: 100,
            validate_words: true,
        })
        .with_iterations(1_000);
        assert_eq!(strict.decrypt(&blob, "aaaaaaaaaaaa").await.unwrap().expose(), SEED);
    }

    #[tokio::test]
    async fn test_word_checks() {
        let vault = fast_vault();

        assert!(matches!(
            vault.encrypt("abandon ability able", PASSPHRASE).await,
            Err(VaultError::InvalidSeedPhrase(_))
        ));

        let typo = SEED.replace("absent", "absnet");
        assert!(matches!(
            vault.encrypt(&typo, PASSPHRASE).await,
            Err(VaultError::InvalidSeedPhrase(_))
        ));

        let relaxed = SeedVault::with_policy(VaultPolicy {
            min_strength: DEFAULT_MIN_STRENGTH,
            validate_words: false,
        })
        .with_iterations(1_000);
        let blob = relaxed.encrypt(&typo, PASSPHRASE).await.unwrap();
        assert_eq!(relaxed.decrypt(&blob, PASSPHRASE).await.unwrap().expose(), typo);
    }

    #[tokio::test]
    async fn test_recovered_seed_debug_hides_words() {
        let vault = fast_vault();
        let blob = vault.encrypt(SEED, PASSPHRASE).await.unwrap();
        let recovered = vault.decrypt(&blob, PASSPHRASE).await.unwrap();

        let debug = format!("{:?}", recovered);
        assert_eq!(debug, "RecoveredSeed { words: 12 }");
        assert!(!debug.contains("abandon"));
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let vault = fast_vault();
        let long = phrase_of(24);

        let (a, b) = tokio::join!(
            vault.encrypt(SEED, PASSPHRASE),
            vault.encrypt(&long, "An0ther-passphrase!")
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(vault.decrypt(&a, PASSPHRASE).await.unwrap().expose(), SEED);
        assert_eq!(
            vault.decrypt(&b, "An0ther-passphrase!").await.unwrap().into_inner(),
            long
        );
        assert!(matches!(
            vault.decrypt(&a, "An0ther-passphrase!").await,
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            min_passphrase_strength: 70,
            validate_bip39_words: false,
            ..Settings::new()
        };
        let vault = SeedVault::from_settings(&settings);

        assert_eq!(vault.policy().min_strength, 70);
        assert!(!vault.policy().validate_words);
        assert_eq!(vault.iterations, PBKDF2_ITERATIONS);
    }
}
