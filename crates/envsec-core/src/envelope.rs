use crate::error::SecretsError;

/// Current (and only) envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest possible encoded envelope: version byte, nonce, empty
/// ciphertext, tag.
pub const MIN_ENVELOPE_LEN: usize = 1 + NONCE_LEN + TAG_LEN;

/// The on-disk container for one encrypted secrets file.
///
/// Encoded layout is fixed: `version || nonce || ciphertext || tag`. The
/// version byte comes first so future layouts can be told apart without
/// guessing; decoding fails closed on anything it does not recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: u8,
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl Envelope {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MIN_ENVELOPE_LEN + self.ciphertext.len());
        out.push(self.version);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SecretsError> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(SecretsError::Format {
                reason: format!(
                    "envelope is {} bytes, minimum is {MIN_ENVELOPE_LEN}",
                    bytes.len()
                ),
            });
        }

        let version = bytes[0];
        if version != ENVELOPE_VERSION {
            return Err(SecretsError::Format {
                reason: format!("unrecognised envelope version {version}"),
            });
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[1..1 + NONCE_LEN]);

        let body = &bytes[1 + NONCE_LEN..];
        let (ciphertext, tag_bytes) = body.split_at(body.len() - TAG_LEN);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(tag_bytes);

        Ok(Self {
            version,
            nonce,
            ciphertext: ciphertext.to_vec(),
            tag,
        })
    }
}
