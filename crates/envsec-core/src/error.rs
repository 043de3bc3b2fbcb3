use thiserror::Error;

/// Errors produced by the secrets subsystem.
///
/// The variants are deliberately coarse: callers react to the class of
/// failure (missing key vs. tampered file), never to the details. Key bytes
/// and plaintext fragments never appear in messages.
#[derive(Debug, Error)]
pub enum SecretsError {
    /// Secrets are required but cannot be resolved (encrypted file present,
    /// no key supplied). Fatal at startup.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// Malformed envelope, unrecognised envelope version, or unparseable
    /// secrets text. Never retried.
    #[error("format error: {reason}")]
    Format { reason: String },

    /// AEAD authentication failed: wrong key, corruption, or tampering.
    /// No plaintext is surfaced.
    #[error("integrity failure: envelope authentication failed")]
    Integrity,

    /// Missing or malformed key token.
    #[error("key error: {reason}")]
    Key { reason: String },

    /// Cipher-level failure outside authentication (should not occur with
    /// well-formed inputs).
    #[error("crypto failure: {reason}")]
    Crypto { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
