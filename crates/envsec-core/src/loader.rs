//! Startup loader: decides which secrets source is present and injects the
//! resolved variables into the process environment exactly once, before any
//! other subsystem reads configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, instrument, warn};

use crate::dotenv;
use crate::engine;
use crate::error::SecretsError;
use crate::key::Key;

/// Plaintext secrets file consulted first (dev/legacy path).
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Encrypted secrets file (the committable artifact).
pub const DEFAULT_ENCRYPTED_FILE: &str = ".env.enc";

/// Environment variable carrying the encoded key token.
pub const DEFAULT_KEY_VAR: &str = "ENV_ENC_KEY";

/// Where the loader looks for secrets and which variable names the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderPaths {
    pub env_file: PathBuf,
    pub encrypted_file: PathBuf,
    pub key_var: String,
}

impl LoaderPaths {
    /// Default file names rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            env_file: dir.join(DEFAULT_ENV_FILE),
            encrypted_file: dir.join(DEFAULT_ENCRYPTED_FILE),
            key_var: DEFAULT_KEY_VAR.to_string(),
        }
    }
}

impl Default for LoaderPaths {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Which secrets source detection found. One variant per §startup branch so
/// each is testable on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsSource {
    /// Nothing on disk; whatever the hosting platform injected stands.
    NoSecrets,
    /// A plaintext file is present and wins over everything else.
    PlaintextFile(PathBuf),
    /// Only the encrypted artifact is present; a key is required.
    EncryptedFile(PathBuf),
}

/// Abstraction over the process environment, so resolution and injection are
/// unit-testable without touching global state.
pub trait EnvSink {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: String);
}

/// The real process environment.
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl EnvSink for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set(&mut self, name: &str, value: String) {
        std::env::set_var(name, value);
    }
}

/// In-memory environment for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvSink for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: String) {
        self.vars.insert(name.to_string(), value);
    }
}

/// Classify what is on disk. Plaintext beats encrypted; absence of both is a
/// valid terminal state.
pub fn detect(paths: &LoaderPaths) -> SecretsSource {
    if paths.env_file.exists() {
        SecretsSource::PlaintextFile(paths.env_file.clone())
    } else if paths.encrypted_file.exists() {
        SecretsSource::EncryptedFile(paths.encrypted_file.clone())
    } else {
        SecretsSource::NoSecrets
    }
}

/// Resolve the secrets map for the detected source without mutating
/// anything. Decrypted plaintext lives only in the returned pairs.
#[instrument(skip_all)]
pub fn resolve(
    paths: &LoaderPaths,
    sink: &impl EnvSink,
) -> Result<(SecretsSource, Vec<(String, String)>), SecretsError> {
    match detect(paths) {
        SecretsSource::PlaintextFile(path) => {
            debug!(path = %path.display(), "loading plaintext secrets file");
            let text = fs::read_to_string(&path)?;
            let pairs = dotenv::parse(&text)?;
            Ok((SecretsSource::PlaintextFile(path), pairs))
        }
        SecretsSource::EncryptedFile(path) => {
            let token = sink
                .get(&paths.key_var)
                .ok_or_else(|| SecretsError::Configuration {
                    reason: format!(
                        "{} is present but {} is not set",
                        path.display(),
                        paths.key_var
                    ),
                })?;
            let key = Key::decode(&token)?;

            debug!(path = %path.display(), "decrypting secrets file");
            let bytes = fs::read(&path)?;
            let plaintext = engine::open(&bytes, &key)?;
            let text = String::from_utf8(plaintext).map_err(|_| SecretsError::Format {
                reason: "decrypted secrets are not valid UTF-8".to_string(),
            })?;
            let pairs = dotenv::parse(&text)?;
            Ok((SecretsSource::EncryptedFile(path), pairs))
        }
        SecretsSource::NoSecrets => {
            debug!("no secrets file present, keeping ambient environment");
            Ok((SecretsSource::NoSecrets, Vec::new()))
        }
    }
}

/// The single explicit injection step. Variables already present in the sink
/// win, so re-applying the same resolution is a no-op.
pub fn apply(pairs: &[(String, String)], sink: &mut impl EnvSink) {
    for (name, value) in pairs {
        if sink.get(name).is_some() {
            debug!(%name, "skipping variable already present in environment");
            continue;
        }
        sink.set(name, value.clone());
    }
}

static LOADED: OnceLock<SecretsSource> = OnceLock::new();

/// Process-level entry point: resolve and apply against the real
/// environment, exactly once per process lifetime. Later calls return the
/// first outcome without re-reading anything.
pub fn init(paths: &LoaderPaths) -> Result<SecretsSource, SecretsError> {
    if let Some(source) = LOADED.get() {
        warn!("secrets loader invoked more than once; keeping first outcome");
        return Ok(source.clone());
    }

    let mut env = ProcessEnv;
    let (source, pairs) = resolve(paths, &env)?;
    apply(&pairs, &mut env);
    Ok(LOADED.get_or_init(|| source).clone())
}
