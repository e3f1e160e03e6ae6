//! # mnemoniqr-cli
//!
//! Command-line front end for MnemoniQR. Seals a seed phrase into a base64
//! blob (ready to be printed as a QR code) and opens it again.

pub mod commands;
pub mod error;
pub mod input;

pub use commands::{config_reset, config_set, config_show, Runner};
pub use error::{CliError, Result};
pub use input::{BlobSource, Prompt, ScriptedPrompt, TerminalPrompt};
