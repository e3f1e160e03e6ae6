//! Passphrase policy: minimum length, strength estimate and generation
//!
//! The strength score is a UX gate only. The length floor is what the vault
//! always enforces before spending time on key derivation.

use rand::{rngs::OsRng, seq::SliceRandom, Rng};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

/// Minimum passphrase length in characters
pub const MIN_PASSPHRASE_LEN: usize = 12;

/// Default minimum strength score accepted for encryption
pub const DEFAULT_MIN_STRENGTH: u8 = 40;

/// Default length of generated passphrases
pub const DEFAULT_GENERATED_LEN: usize = 16;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=";

/// Coarse strength bucket for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl StrengthLevel {
    /// Bucket a 0-100 score
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=19 => StrengthLevel::VeryWeak,
            20..=39 => StrengthLevel::Weak,
            40..=59 => StrengthLevel::Moderate,
            60..=79 => StrengthLevel::Strong,
            _ => StrengthLevel::VeryStrong,
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StrengthLevel::VeryWeak => "Very weak",
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Moderate => "Moderate",
            StrengthLevel::Strong => "Strong",
            StrengthLevel::VeryStrong => "Very strong",
        };
        f.write_str(text)
    }
}

/// Estimate passphrase strength on a 0-100 scale
///
/// Length contributes up to 40 points (4 per character); uppercase,
/// lowercase and digits add 10 each; any other character adds 15.
pub fn strength(passphrase: &str) -> u8 {
    if passphrase.is_empty() {
        return 0;
    }

    let length_points = (passphrase.chars().count() * 4).min(40);
    let mut score = length_points as u32;

    if passphrase.chars().any(|c| c.is_ascii_uppercase()) {
        score += 10;
    }
    if passphrase.chars().any(|c| c.is_ascii_lowercase()) {
        score += 10;
    }
    if passphrase.chars().any(|c| c.is_ascii_digit()) {
        score += 10;
    }
    if passphrase.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 15;
    }

    score.min(100) as u8
}

/// Check that a passphrase may be used for encryption
pub fn check(passphrase: &str, min_strength: u8) -> Result<()> {
    if passphrase.is_empty() {
        return Err(VaultError::Validation("passphrase is required".to_string()));
    }

    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(VaultError::WeakPassphrase(format!(
            "must be at least {} characters",
            MIN_PASSPHRASE_LEN
        )));
    }

    let score = strength(passphrase);
    if score < min_strength {
        return Err(VaultError::WeakPassphrase(format!(
            "strength {} is below the required {}",
            score, min_strength
        )));
    }

    Ok(())
}

/// Generate a random passphrase
///
/// Lengths below [`MIN_PASSPHRASE_LEN`] are raised to it. The result always
/// contains at least one uppercase letter, lowercase letter, digit and symbol.
pub fn generate(length: usize) -> Zeroizing<String> {
    let length = length.max(MIN_PASSPHRASE_LEN);
    let mut rng = OsRng;

    let alphabet: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS].concat();

    // One from each class, the rest from the whole alphabet, then shuffle
    let mut chars: Zeroizing<Vec<u8>> = Zeroizing::new(
        [UPPER, LOWER, DIGITS, SYMBOLS]
            .iter()
            .map(|class| class[rng.gen_range(0..class.len())])
            .collect(),
    );
    while chars.len() < length {
        chars.push(alphabet[rng.gen_range(0..alphabet.len())]);
    }
    chars.shuffle(&mut rng);

    Zeroizing::new(chars.iter().copied().map(char::from).collect())
}
