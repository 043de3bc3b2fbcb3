use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

use crate::error::SecretsError;

/// Key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// 256-bit symmetric key for the secrets store.
///
/// Exists only in memory; operators hold it as the encoded token printed by
/// `gen-key` and hand it to processes through a single environment variable.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    bytes: [u8; KEY_LEN],
}

impl Key {
    /// Generate a fresh key from the OS CSPRNG. An entropy-source failure
    /// aborts the process; there is no degraded mode for key generation.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Encode as the printable token shown to operators.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.bytes)
    }

    /// Decode an operator-supplied token, rejecting malformed base64 and
    /// wrong-length key material.
    pub fn decode(token: &str) -> Result<Self, SecretsError> {
        let decoded = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|err| SecretsError::Key {
                reason: format!("key token is not valid base64: {err}"),
            })?;

        if decoded.len() != KEY_LEN {
            return Err(SecretsError::Key {
                reason: format!(
                    "key token decodes to {} bytes, expected {KEY_LEN}",
                    decoded.len()
                ),
            });
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self { bytes })
    }
}

// Redacted so a stray debug log can never leak key bytes.
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}
