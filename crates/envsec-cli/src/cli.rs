use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Operator surface for the encrypted secrets file. Intentionally small:
/// everything else in the deployment reads plain environment variables.
#[derive(Parser, Debug)]
#[command(
    name = "envsec",
    about = "Manage the encrypted secrets file for the BDC backend",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate a new encryption key and print its token.
    GenKey,
    /// Encrypt a plaintext secrets file into a versioned envelope.
    Encrypt {
        /// Path to the plaintext secrets file.
        input: PathBuf,
        /// Path to write the encrypted envelope.
        output: PathBuf,
        /// Key token; falls back to the key environment variable.
        #[arg(long)]
        key: Option<String>,
    },
    /// Decrypt an envelope back to plaintext.
    Decrypt {
        /// Path to the encrypted envelope.
        input: PathBuf,
        /// Optional plaintext output path; prints to stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Key token; falls back to the key environment variable.
        #[arg(long)]
        key: Option<String>,
    },
    /// Encrypt a single value and wrap it as ENC(...).
    EncryptValue {
        /// Plaintext value to encrypt.
        value: String,
        /// Key token; falls back to the key environment variable.
        #[arg(long)]
        key: Option<String>,
    },
    /// Decrypt a single value (accepts a bare token or ENC(...)).
    DecryptValue {
        /// Encrypted token or ENC(token).
        value: String,
        /// Key token; falls back to the key environment variable.
        #[arg(long)]
        key: Option<String>,
    },
}
