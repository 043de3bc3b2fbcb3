use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use envsec_core::{engine, Key};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::CliError;

/// Resolve the key for a command: explicit `--key` first, then the key
/// environment variable. Token decoding errors surface as key errors either
/// way.
pub fn resolve_key(flag: Option<&str>, key_var: &str) -> Result<Key, CliError> {
    let token = match flag {
        Some(token) => token.to_string(),
        None => std::env::var(key_var).map_err(|_| {
            CliError::from(envsec_core::SecretsError::Key {
                reason: format!("no --key given and {key_var} is not set"),
            })
        })?,
    };
    Ok(Key::decode(&token)?)
}

/// Read plaintext, seal it, and atomically replace the envelope at `output`.
pub fn encrypt_file(input: &Path, output: &Path, key: &Key) -> Result<(), CliError> {
    let plaintext = fs::read(input)
        .map_err(|err| CliError::usage(format!("cannot read {}: {err}", input.display())))?;
    let sealed = engine::seal(&plaintext, key)?;
    write_atomic(output, &sealed)?;
    debug!(output = %output.display(), "wrote envelope");
    Ok(())
}

/// Read an envelope, open it, and return the plaintext. When `output` is
/// given the plaintext is also written there atomically (the explicit
/// decrypt-for-editing path); otherwise the caller prints it.
pub fn decrypt_file(input: &Path, output: Option<&Path>, key: &Key) -> Result<Vec<u8>, CliError> {
    let bytes = fs::read(input)
        .map_err(|err| CliError::usage(format!("cannot read {}: {err}", input.display())))?;
    let plaintext = engine::open(&bytes, key)?;
    if let Some(path) = output {
        write_atomic(path, &plaintext)?;
        debug!(output = %path.display(), "wrote plaintext");
    }
    Ok(plaintext)
}

/// Write-to-temp-then-rename in the destination directory, so no reader ever
/// observes a half-written file and a failed run leaves any previous file
/// untouched.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|err| CliError::Io(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use envsec_core::SecretsError;

    #[test]
    fn resolve_key_prefers_flag_over_environment() {
        let key = Key::generate();
        let resolved = resolve_key(Some(&key.encode()), "ENVSEC_UNSET_TEST_VAR")
            .expect("flag key should resolve");
        assert_eq!(resolved, key);
    }

    #[test]
    fn resolve_key_reads_environment_variable() {
        let key = Key::generate();
        std::env::set_var("ENVSEC_RESOLVE_TEST_KEY", key.encode());
        let resolved = resolve_key(None, "ENVSEC_RESOLVE_TEST_KEY").expect("env key");
        assert_eq!(resolved, key);
    }

    #[test]
    fn resolve_key_without_any_source_is_a_key_error() {
        let err = resolve_key(None, "ENVSEC_DEFINITELY_UNSET_VAR").expect_err("must fail");
        assert!(matches!(
            err,
            CliError::Secrets(SecretsError::Key { .. })
        ));
    }

    #[test]
    fn encrypt_then_decrypt_reproduces_input_byte_for_byte() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("secrets.txt");
        let sealed = dir.path().join("secrets.enc");
        let restored = dir.path().join("restored.txt");
        let contents = b"# db\nDB_HOST=localhost\nDB_PASSWORD=hunter2\n";
        fs::write(&input, contents).expect("write input");

        let key = Key::decode(&Key::generate().encode()).expect("token round trip");
        encrypt_file(&input, &sealed, &key).expect("encrypt");
        assert_ne!(fs::read(&sealed).expect("read sealed"), contents.to_vec());

        let plaintext = decrypt_file(&sealed, Some(&restored), &key).expect("decrypt");
        assert_eq!(plaintext, contents);
        assert_eq!(fs::read(&restored).expect("read restored"), contents.to_vec());
    }

    #[test]
    fn encrypt_missing_input_is_a_usage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = encrypt_file(
            &dir.path().join("absent.txt"),
            &dir.path().join("out.enc"),
            &Key::generate(),
        )
        .expect_err("must fail");
        assert!(matches!(err, CliError::Usage { .. }));
        assert!(!dir.path().join("out.enc").exists());
    }

    #[test]
    fn tampered_envelope_fails_with_integrity_and_keeps_no_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("secrets.txt");
        let sealed = dir.path().join("secrets.enc");
        fs::write(&input, b"DB_HOST=localhost\n").expect("write input");

        let key = Key::generate();
        encrypt_file(&input, &sealed, &key).expect("encrypt");

        let mut bytes = fs::read(&sealed).expect("read sealed");
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        fs::write(&sealed, &bytes).expect("write tampered");

        let out = dir.path().join("restored.txt");
        let err = decrypt_file(&sealed, Some(&out), &key).expect_err("must fail");
        assert!(matches!(err, CliError::Secrets(SecretsError::Integrity)));
        assert!(!out.exists());
    }

    #[test]
    fn encrypt_atomically_replaces_existing_envelope() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("secrets.txt");
        let sealed = dir.path().join("secrets.enc");
        let key = Key::generate();

        fs::write(&input, b"A=1\n").expect("write input");
        encrypt_file(&input, &sealed, &key).expect("first encrypt");

        fs::write(&input, b"A=2\n").expect("rewrite input");
        encrypt_file(&input, &sealed, &key).expect("second encrypt");

        let plaintext = decrypt_file(&sealed, None, &key).expect("decrypt");
        assert_eq!(plaintext, b"A=2\n");
        // No stray temp files on the success path.
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let name = entry.file_name();
                name != "secrets.txt" && name != "secrets.enc"
            })
            .collect();
        assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
    }
}
