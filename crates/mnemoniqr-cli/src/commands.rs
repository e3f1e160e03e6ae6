//! Command implementations
//!
//! Each command returns the text to print on stdout; diagnostics go through
//! `tracing` to stderr.

use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{debug, info};
use zeroize::Zeroizing;

use mnemoniqr_core::passphrase::{self, StrengthLevel};
use mnemoniqr_core::{suggest, RecoveredSeed, SeedVault, Settings, SettingsManager};

use crate::error::Result;
use crate::input::{read_passphrase, read_seed_phrase, BlobSource, Prompt};

/// Runs CLI commands against a vault built from user settings
pub struct Runner<P: Prompt> {
    vault: SeedVault,
    settings: Settings,
    prompt: P,
    env_passphrase: Option<Zeroizing<String>>,
}

impl<P: Prompt> Runner<P> {
    /// Create a runner
    pub fn new(settings: Settings, prompt: P) -> Self {
        Self {
            vault: SeedVault::from_settings(&settings),
            settings,
            prompt,
            env_passphrase: None,
        }
    }

    /// Use a passphrase supplied through the environment instead of prompting
    pub fn with_env_passphrase(mut self, passphrase: Option<String>) -> Self {
        self.env_passphrase = passphrase.map(Zeroizing::new);
        self
    }

    /// Seal a seed phrase and return the base64 blob
    pub async fn encrypt(&mut self, seed_file: Option<&PathBuf>) -> Result<String> {
        let seed_phrase = read_seed_phrase(&mut self.prompt, seed_file).await?;
        let from_env = self.env_passphrase.as_ref().map(|p| p.as_str());
        let passphrase = read_passphrase(&mut self.prompt, from_env, true)?;

        info!("Deriving keys, this takes a moment");
        let blob = self.vault.encrypt(&seed_phrase, &passphrase).await?;
        debug!("Encrypted blob is {} characters", blob.len());
        Ok(blob)
    }

    /// Open a sealed blob and return the numbered words
    pub async fn decrypt(&mut self, source: &BlobSource) -> Result<String> {
        let blob = source.read().await?;
        let from_env = self.env_passphrase.as_ref().map(|p| p.as_str());
        let passphrase = read_passphrase(&mut self.prompt, from_env, false)?;

        info!("Deriving keys, this takes a moment");
        let recovered = self.vault.decrypt(&blob, &passphrase).await?;
        Ok(format_words(&recovered))
    }

    /// Score a prompted passphrase
    pub fn strength(&mut self) -> Result<String> {
        let from_env = self.env_passphrase.as_ref().map(|p| p.as_str());
        let passphrase = read_passphrase(&mut self.prompt, from_env, false)?;
        let score = passphrase::strength(&passphrase);
        let level = StrengthLevel::from_score(score);

        let verdict = match passphrase::check(&passphrase, self.settings.min_passphrase_strength)
        {
            Ok(()) => "accepted".to_string(),
            Err(e) => format!("rejected ({})", e),
        };

        Ok(format!("Security: {} ({}/100), {}", level, score, verdict))
    }

    /// Generate a passphrase, defaulting to the configured length
    pub fn generate_passphrase(&self, length: Option<usize>) -> Zeroizing<String> {
        passphrase::generate(length.unwrap_or(self.settings.generated_passphrase_length))
    }

    /// List BIP-39 words starting with `prefix`
    pub fn suggest(&self, prefix: &str, limit: Option<usize>) -> String {
        suggest(prefix, limit.unwrap_or(self.settings.suggestion_limit)).join("\n")
    }
}

/// Print the settings file location and its effective values
pub fn config_show(manager: &SettingsManager) -> Result<String> {
    Ok(format!(
        "# {}\n{}",
        manager.path().display(),
        manager.to_json()?
    ))
}

/// Change one setting and persist it
pub async fn config_set(manager: &mut SettingsManager, key: &str, value: &str) -> Result<String> {
    manager.set(key, value).await?;
    info!("Set {} = {} in {:?}", key, value.trim(), manager.path());
    Ok(format!("{} = {}", key, value.trim()))
}

/// Restore defaults by removing the settings file
pub async fn config_reset(manager: &mut SettingsManager) -> Result<String> {
    manager.reset().await?;
    Ok(format!("Settings reset to defaults ({})", manager.path().display()))
}

/// Render recovered words as a numbered list
fn format_words(recovered: &RecoveredSeed) -> String {
    let mut out = String::new();
    for (index, word) in recovered.words().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", index + 1, word);
    }
    let _ = write!(out, "({} words)", recovered.word_count());
    out
}
