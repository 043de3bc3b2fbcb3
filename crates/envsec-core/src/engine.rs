//! Authenticated encryption over in-memory byte payloads. No file I/O
//! happens here; callers hand in bytes and get bytes (or an envelope) back.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
    Aes256Gcm, Nonce,
};
use tracing::instrument;

use crate::envelope::{Envelope, ENVELOPE_VERSION, TAG_LEN};
use crate::error::SecretsError;
use crate::key::Key;

/// Encrypt a plaintext payload under `key`.
///
/// A fresh random 96-bit nonce is drawn per call, so encrypting the same
/// plaintext twice yields distinct envelopes. The envelope version is bound
/// as associated data, which makes a version-downgrade edit fail
/// authentication rather than decrypt under the wrong layout.
#[instrument(skip_all, fields(plaintext_len = plaintext.len()))]
pub fn encrypt(plaintext: &[u8], key: &Key) -> Result<Envelope, SecretsError> {
    let cipher = build_cipher(key)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let sealed = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &[ENVELOPE_VERSION],
            },
        )
        .map_err(|_| SecretsError::Crypto {
            reason: "encryption failed".to_string(),
        })?;

    // aes-gcm appends the tag to the ciphertext; the envelope keeps them
    // as separate fields.
    let (ciphertext, tag_bytes) = sealed.split_at(sealed.len() - TAG_LEN);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(tag_bytes);

    Ok(Envelope {
        version: ENVELOPE_VERSION,
        nonce: nonce.into(),
        ciphertext: ciphertext.to_vec(),
        tag,
    })
}

/// Verify and decrypt an envelope under `key`.
///
/// Any authentication mismatch (wrong key, corrupted or tampered bytes)
/// yields [`SecretsError::Integrity`]; no partial plaintext is ever
/// returned. Tag verification is constant-time inside `aes-gcm`.
#[instrument(skip_all, fields(ciphertext_len = envelope.ciphertext.len()))]
pub fn decrypt(envelope: &Envelope, key: &Key) -> Result<Vec<u8>, SecretsError> {
    if envelope.version != ENVELOPE_VERSION {
        return Err(SecretsError::Format {
            reason: format!("unrecognised envelope version {}", envelope.version),
        });
    }

    let cipher = build_cipher(key)?;
    let nonce = Nonce::from_slice(&envelope.nonce);

    let mut sealed = envelope.ciphertext.clone();
    sealed.extend_from_slice(&envelope.tag);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: &sealed,
                aad: &[envelope.version],
            },
        )
        .map_err(|_| SecretsError::Integrity)
}

/// Encrypt and encode in one step: the bytes written to `.env.enc`.
pub fn seal(plaintext: &[u8], key: &Key) -> Result<Vec<u8>, SecretsError> {
    Ok(encrypt(plaintext, key)?.encode())
}

/// Decode and decrypt in one step: the inverse of [`seal`].
pub fn open(bytes: &[u8], key: &Key) -> Result<Vec<u8>, SecretsError> {
    decrypt(&Envelope::decode(bytes)?, key)
}

fn build_cipher(key: &Key) -> Result<Aes256Gcm, SecretsError> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|err| SecretsError::Crypto {
        reason: format!("cipher init failed: {err}"),
    })
}
