//! Seed phrase parsing and BIP-39 word hints
//!
//! Word-list checks are a convenience for catching typos. They play no part
//! in the encryption itself, which treats the phrase as opaque text.

use bip39::Language;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VaultError};

/// Word counts accepted for a seed phrase
pub const VALID_WORD_COUNTS: [usize; 3] = [12, 18, 24];

/// Default number of word suggestions
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Shortest prefix that yields suggestions
pub const MIN_SUGGESTION_PREFIX: usize = 2;

/// Maximum number of unknown words quoted in an error message
const MAX_REPORTED_WORDS: usize = 5;

/// A whitespace-normalized seed phrase - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SeedPhrase {
    phrase: String,
}

impl SeedPhrase {
    /// Parse user input into a seed phrase
    ///
    /// Words are split on any whitespace and re-joined with single spaces.
    /// The word count must be 12, 18 or 24.
    pub fn parse(input: &str) -> Result<Self> {
        let phrase = input.split_whitespace().collect::<Vec<_>>().join(" ");
        if phrase.is_empty() {
            return Err(VaultError::Validation("seed phrase is required".to_string()));
        }

        let count = phrase.split(' ').count();
        if !VALID_WORD_COUNTS.contains(&count) {
            return Err(VaultError::InvalidSeedPhrase(format!(
                "must contain 12, 18 or 24 words, got {}",
                count
            )));
        }

        Ok(Self { phrase })
    }

    /// The normalized phrase
    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    /// Number of words
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Iterate over the words
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrase.split(' ')
    }

    /// Words that are not in the English BIP-39 word list
    pub fn invalid_words(&self) -> Vec<&str> {
        self.words().filter(|word| !is_bip39_word(word)).collect()
    }

    /// Fail if any word is outside the English BIP-39 word list
    pub fn check_words(&self) -> Result<()> {
        let invalid = self.invalid_words();
        if invalid.is_empty() {
            return Ok(());
        }

        let mut listed = invalid
            .iter()
            .take(MAX_REPORTED_WORDS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if invalid.len() > MAX_REPORTED_WORDS {
            listed.push_str("...");
        }

        Err(VaultError::InvalidSeedPhrase(format!(
            "unknown words: {}",
            listed
        )))
    }
}

impl std::fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedPhrase")
            .field("words", &self.word_count())
            .finish()
    }
}

/// Whether a word is in the English BIP-39 word list
pub fn is_bip39_word(word: &str) -> bool {
    Language::English.word_list().iter().any(|known| *known == word)
}

/// Suggest BIP-39 words starting with `prefix`
///
/// Matching is case-insensitive. Prefixes shorter than two characters yield
/// no suggestions.
pub fn suggest(prefix: &str, limit: usize) -> Vec<&'static str> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.chars().count() < MIN_SUGGESTION_PREFIX {
        return Vec::new();
    }

    Language::English
        .word_list()
        .iter()
        .copied()
        .filter(|word| word.starts_with(&prefix))
        .take(limit)
        .collect()
}
