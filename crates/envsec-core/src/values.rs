//! Value-level helpers for keeping a single secret inline in an otherwise
//! plaintext file, wrapped as `ENC(<token>)`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::engine;
use crate::error::SecretsError;
use crate::key::Key;

const ENC_PREFIX: &str = "ENC(";
const ENC_SUFFIX: char = ')';

/// Encrypt one value and wrap the encoded envelope as `ENC(...)`.
pub fn encrypt_value(value: &str, key: &Key) -> Result<String, SecretsError> {
    let sealed = engine::seal(value.as_bytes(), key)?;
    Ok(format!("{ENC_PREFIX}{}{ENC_SUFFIX}", URL_SAFE_NO_PAD.encode(sealed)))
}

/// Decrypt a single value, accepting either `ENC(<token>)` or a bare token.
pub fn decrypt_value(input: &str, key: &Key) -> Result<String, SecretsError> {
    let token = input
        .strip_prefix(ENC_PREFIX)
        .and_then(|rest| rest.strip_suffix(ENC_SUFFIX))
        .unwrap_or(input);

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|err| SecretsError::Format {
            reason: format!("value token is not valid base64: {err}"),
        })?;

    let plaintext = engine::open(&bytes, key)?;
    String::from_utf8(plaintext).map_err(|_| SecretsError::Format {
        reason: "decrypted value is not valid UTF-8".to_string(),
    })
}
