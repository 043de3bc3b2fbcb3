use envsec_core::SecretsError;
use thiserror::Error;

/// Exit codes, one per error class so tooling can tell tampering apart from
/// misconfiguration. Code 2 matches what clap itself uses for bad
/// invocations.
pub mod exit {
    pub const USAGE: u8 = 2;
    pub const KEY: u8 = 3;
    pub const FORMAT: u8 = 4;
    pub const INTEGRITY: u8 = 5;
    pub const CONFIGURATION: u8 = 6;
    pub const IO: u8 = 1;
}

/// Command-level errors wrapping the library taxonomy.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed invocation: missing/unreadable input and similar. No side
    /// effects have occurred when this is raised.
    #[error("usage error: {reason}")]
    Usage { reason: String },

    #[error(transparent)]
    Secrets(#[from] SecretsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn usage(reason: impl Into<String>) -> Self {
        Self::Usage {
            reason: reason.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage { .. } => exit::USAGE,
            CliError::Secrets(SecretsError::Key { .. }) => exit::KEY,
            CliError::Secrets(SecretsError::Format { .. }) => exit::FORMAT,
            CliError::Secrets(SecretsError::Integrity) => exit::INTEGRITY,
            CliError::Secrets(SecretsError::Configuration { .. }) => exit::CONFIGURATION,
            CliError::Secrets(SecretsError::Crypto { .. })
            | CliError::Secrets(SecretsError::Io(_))
            | CliError::Io(_) => exit::IO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_code_is_distinct_from_usage_and_configuration() {
        let integrity = CliError::from(SecretsError::Integrity).exit_code();
        let usage = CliError::usage("bad input").exit_code();
        let config = CliError::from(SecretsError::Configuration {
            reason: "no key".to_string(),
        })
        .exit_code();

        assert_ne!(integrity, usage);
        assert_ne!(integrity, config);
        assert_ne!(usage, config);
    }

    #[test]
    fn key_errors_map_to_their_own_code() {
        let err = CliError::from(SecretsError::Key {
            reason: "missing".to_string(),
        });
        assert_eq!(err.exit_code(), exit::KEY);
    }
}
