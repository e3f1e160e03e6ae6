//! Reading secrets and sealed blobs from the terminal, files and stdin

use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{CliError, Result};

/// Source of interactively entered secrets
pub trait Prompt {
    /// Ask for a secret without echoing it
    fn read_secret(&mut self, label: &str) -> std::io::Result<String>;
}

/// Hidden terminal prompt
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_secret(&mut self, label: &str) -> std::io::Result<String> {
        rpassword::prompt_password(label)
    }
}

/// Prompt that replays pre-set answers, for scripted use and tests
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
}

impl ScriptedPrompt {
    /// Create a prompt answering with `answers` in order
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn read_secret(&mut self, label: &str) -> std::io::Result<String> {
        self.answers.pop_front().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("no scripted answer for {:?}", label),
            )
        })
    }
}

/// Where to read an encrypted blob from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobSource {
    /// Given directly on the command line
    Inline(String),
    /// Read from a text file (e.g. the output of a QR scanner)
    File(PathBuf),
    /// Read from standard input
    Stdin,
}

impl BlobSource {
    /// Pick the source from the optional argument and `--in` path
    pub fn from_args(blob: Option<String>, path: Option<PathBuf>) -> Self {
        match (blob, path) {
            (Some(blob), _) => BlobSource::Inline(blob),
            (None, Some(path)) => BlobSource::File(path),
            (None, None) => BlobSource::Stdin,
        }
    }

    /// Read the blob text, trimmed
    pub async fn read(&self) -> Result<String> {
        let text = match self {
            BlobSource::Inline(blob) => blob.clone(),
            BlobSource::File(path) => {
                debug!("Reading blob from {:?}", path);
                tokio::fs::read_to_string(path).await?
            }
            BlobSource::Stdin => {
                let mut text = String::new();
                tokio::io::stdin().read_to_string(&mut text).await?;
                text
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(CliError::MissingInput("encrypted data".to_string()));
        }
        Ok(text.to_string())
    }
}

/// Read a seed phrase from a file or a hidden prompt
pub async fn read_seed_phrase<P: Prompt>(
    prompt: &mut P,
    path: Option<&PathBuf>,
) -> Result<Zeroizing<String>> {
    let phrase = match path {
        Some(path) => {
            debug!("Reading seed phrase from {:?}", path);
            Zeroizing::new(tokio::fs::read_to_string(path).await?)
        }
        None => Zeroizing::new(prompt.read_secret("Seed phrase: ")?),
    };
    Ok(phrase)
}

/// Resolve the passphrase from the environment or a hidden prompt
///
/// With `confirm`, a prompted passphrase must be entered twice.
pub fn read_passphrase<P: Prompt>(
    prompt: &mut P,
    from_env: Option<&str>,
    confirm: bool,
) -> Result<Zeroizing<String>> {
    if let Some(passphrase) = from_env {
        return Ok(Zeroizing::new(passphrase.to_string()));
    }

    let passphrase = Zeroizing::new(prompt.read_secret("Passphrase: ")?);
    if confirm {
        let again = Zeroizing::new(prompt.read_secret("Confirm passphrase: ")?);
        if *passphrase != *again {
            return Err(CliError::PassphraseMismatch);
        }
    }
    Ok(passphrase)
}
