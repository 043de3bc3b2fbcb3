use std::{
    fs,
    path::{Path, PathBuf},
};

use dirs::config_dir;
use envsec_core::loader::DEFAULT_KEY_VAR;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Operator-level defaults loaded from `<config_dir>/envsec/config.toml`.
/// Everything is optional; a missing or empty file means built-in defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Override for the environment variable carrying the key token.
    pub key_var: Option<String>,
}

impl Config {
    /// The key environment variable the commands should consult.
    pub fn key_var(&self) -> &str {
        self.key_var.as_deref().unwrap_or(DEFAULT_KEY_VAR)
    }
}

/// Load config from the default path; if missing, return defaults.
pub fn load() -> Result<Config, CliError> {
    match default_path() {
        Some(path) => load_from_path(path),
        None => Ok(Config::default()),
    }
}

/// Load config from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, CliError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    toml::from_str(&contents).map_err(|err| CliError::Secrets(
        envsec_core::SecretsError::Configuration {
            reason: format!("invalid config file {}: {err}", path.display()),
        },
    ))
}

/// Resolve the default config path (platform aware).
pub fn default_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("envsec").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_from_path(dir.path().join("config.toml")).expect("load");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.key_var(), DEFAULT_KEY_VAR);
    }

    #[test]
    fn parses_key_var_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "key_var = \"BDC_SECRETS_KEY\"\n").expect("write temp config");

        let cfg = load_from_path(&path).expect("load");
        assert_eq!(cfg.key_var(), "BDC_SECRETS_KEY");
    }

    #[test]
    fn empty_file_means_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "\n  \n").expect("write temp config");
        assert_eq!(load_from_path(&path).expect("load"), Config::default());
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "key_var = [broken").expect("write temp config");

        let err = load_from_path(&path).expect_err("should reject");
        assert_eq!(err.exit_code(), crate::error::exit::CONFIGURATION);
    }
}
