//! The line-oriented `KEY=VALUE` grammar shared by hand-edited `.env` files
//! and the output of `envsec decrypt`.

use crate::error::SecretsError;

/// Parse secrets text into name/value pairs, in file order.
///
/// Blank lines and `#`-prefixed lines are ignored. Everything after the
/// first `=` belongs to the value. A remaining line without `=` is a format
/// error naming the offending line.
pub fn parse(text: &str) -> Result<Vec<(String, String)>, SecretsError> {
    let mut pairs = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (name, value) = line.split_once('=').ok_or_else(|| SecretsError::Format {
            reason: format!("secrets line {}: expected NAME=VALUE", idx + 1),
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(SecretsError::Format {
                reason: format!("secrets line {}: empty variable name", idx + 1),
            });
        }

        pairs.push((name.to_string(), value.to_string()));
    }

    Ok(pairs)
}
