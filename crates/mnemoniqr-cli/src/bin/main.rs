//! MnemoniQR CLI - seal a wallet seed phrase under a passphrase
//!
//! The encrypted output is plain base64 text, meant to be rendered as a QR
//! code by any generator and scanned back later for `decrypt`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mnemoniqr_cli::{config_reset, config_set, config_show, BlobSource, Runner, TerminalPrompt};
use mnemoniqr_core::SettingsManager;

/// Environment variable read instead of prompting for the passphrase
const PASSPHRASE_ENV: &str = "MNEMONIQR_PASSPHRASE";

/// MnemoniQR - passphrase-encrypted seed phrase backups
#[derive(Parser, Debug)]
#[command(name = "mnemoniqr")]
#[command(version)]
#[command(about = "MnemoniQR - encrypt seed phrases for QR code backups")]
struct Args {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a seed phrase and print the base64 blob
    Encrypt {
        /// Read the seed phrase from a file instead of prompting
        #[arg(long)]
        seed_file: Option<PathBuf>,

        /// Write the blob to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Decrypt a base64 blob and print the seed words
    Decrypt {
        /// The blob text (read from --in or stdin when omitted)
        blob: Option<String>,

        /// Read the blob from a file
        #[arg(long = "in")]
        input: Option<PathBuf>,
    },

    /// Estimate the strength of a passphrase
    Strength,

    /// Generate a random passphrase
    GeneratePassphrase {
        /// Number of characters (minimum 12)
        #[arg(long)]
        length: Option<usize>,
    },

    /// Suggest BIP-39 words for a prefix
    Suggest {
        /// At least two leading letters
        prefix: String,

        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the settings file path and current values
    Show,

    /// Set one value, e.g. `config set minPassphraseStrength 60`
    Set {
        /// camelCase key as stored in the settings file
        key: String,
        value: String,
    },

    /// Delete the settings file and return to defaults
    Reset,
}

/// `--verbose` wins, then RUST_LOG, then warnings only
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // stdout carries results only; logs go to stderr
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(args.verbose, rust_log.as_deref()))
        .init();

    let mut settings_manager = match args.config {
        Some(path) => SettingsManager::with_file(path)?,
        None => SettingsManager::new()?,
    };
    debug!("Using settings from {:?}", settings_manager.path());

    // Secrets never come from argv, where other users can read them
    let mut runner = Runner::new(settings_manager.get().clone(), TerminalPrompt)
        .with_env_passphrase(std::env::var(PASSPHRASE_ENV).ok());

    match args.command {
        Command::Encrypt { seed_file, out } => {
            let blob = runner.encrypt(seed_file.as_ref()).await?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, format!("{}\n", blob)).await?;
                    info!("Encrypted blob written to {:?}", path);
                }
                None => println!("{}", blob),
            }
        }
        Command::Decrypt { blob, input } => {
            let source = BlobSource::from_args(blob, input);
            println!("{}", runner.decrypt(&source).await?);
        }
        Command::Strength => {
            println!("{}", runner.strength()?);
        }
        Command::GeneratePassphrase { length } => {
            println!("{}", runner.generate_passphrase(length).as_str());
        }
        Command::Suggest { prefix, limit } => {
            println!("{}", runner.suggest(&prefix, limit));
        }
        Command::Config { action } => {
            let output = match action {
                ConfigAction::Show => config_show(&settings_manager)?,
                ConfigAction::Set { key, value } => {
                    config_set(&mut settings_manager, &key, &value).await?
                }
                ConfigAction::Reset => config_reset(&mut settings_manager).await?,
            };
            println!("{}", output);
        }
    }

    Ok(())
}
