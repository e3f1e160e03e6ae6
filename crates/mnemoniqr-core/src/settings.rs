//! Application settings management
//!
//! Stores non-sensitive UX configuration in a plain JSON file. Nothing here
//! feeds the cryptography: iteration count, key sizes and the wire layout
//! are fixed constants.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, VaultError};
use crate::passphrase::{DEFAULT_GENERATED_LEN, DEFAULT_MIN_STRENGTH, MIN_PASSPHRASE_LEN};
use crate::seed_phrase::DEFAULT_SUGGESTION_LIMIT;

const SETTINGS_FILE: &str = "settings.json";

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Minimum passphrase strength score accepted for encryption
    pub min_passphrase_strength: u8,
    /// Reject seed words outside the BIP-39 English word list
    pub validate_bip39_words: bool,
    /// Length of generated passphrases
    pub generated_passphrase_length: usize,
    /// Maximum number of word suggestions
    pub suggestion_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: 1,
            min_passphrase_strength: DEFAULT_MIN_STRENGTH,
            validate_bip39_words: true,
            generated_passphrase_length: DEFAULT_GENERATED_LEN,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    /// Keys accepted by [`Settings::set`], as they appear in the JSON file
    pub const KEYS: [&'static str; 4] = [
        "minPassphraseStrength",
        "validateBip39Words",
        "generatedPassphraseLength",
        "suggestionLimit",
    ];

    /// Set one value by its JSON key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "minPassphraseStrength" => {
                let score: u8 = parse_value(key, value)?;
                if score > 100 {
                    return Err(VaultError::InvalidSetting(format!(
                        "{} must be between 0 and 100, got {}",
                        key, score
                    )));
                }
                self.min_passphrase_strength = score;
            }
            "validateBip39Words" => self.validate_bip39_words = parse_value(key, value)?,
            "generatedPassphraseLength" => {
                let length: usize = parse_value(key, value)?;
                if length < MIN_PASSPHRASE_LEN {
                    return Err(VaultError::InvalidSetting(format!(
                        "{} must be at least {}, got {}",
                        key, MIN_PASSPHRASE_LEN, length
                    )));
                }
                self.generated_passphrase_length = length;
            }
            "suggestionLimit" => {
                let limit: usize = parse_value(key, value)?;
                if limit == 0 {
                    return Err(VaultError::InvalidSetting(format!(
                        "{} must be at least 1",
                        key
                    )));
                }
                self.suggestion_limit = limit;
            }
            _ => {
                return Err(VaultError::InvalidSetting(format!(
                    "unknown key '{}', expected one of: {}",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        VaultError::InvalidSetting(format!("'{}' is not a valid value for {}", value, key))
    })
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a settings manager in the platform config directory
    pub fn new() -> Result<Self> {
        Self::with_dir(&Self::default_dir()?)
    }

    /// Create a settings manager for a custom directory
    pub fn with_dir(config_dir: &Path) -> Result<Self> {
        Self::with_file(config_dir.join(SETTINGS_FILE))
    }

    /// Create a settings manager for a specific settings file
    ///
    /// A missing file yields defaults. A file that exists but does not parse
    /// is an error: silently dropping a stricter policy would weaken it.
    pub fn with_file(settings_file: PathBuf) -> Result<Self> {
        let settings = Self::load_from_file(&settings_file).map_err(|e| {
            warn!("Unreadable settings file {:?}: {}", settings_file, e);
            e
        })?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Get the default config directory
    fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("io", "mnemoniqr", "mnemoniqr")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                VaultError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine config directory",
                ))
            })
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Path of the backing settings file
    pub fn path(&self) -> &Path {
        &self.settings_file
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Current settings as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.settings)?)
    }

    /// Set one value by its JSON key and save
    ///
    /// Nothing is written when the key or value is rejected.
    pub async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.settings.clone();
        updated.set(key, value)?;
        self.settings = updated;
        self.save().await
    }

    /// Reset settings to defaults and delete settings file
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = Settings::new();

        if self.settings_file.exists() {
            tokio::fs::remove_file(&self.settings_file).await?;
        }

        Ok(())
    }
}
