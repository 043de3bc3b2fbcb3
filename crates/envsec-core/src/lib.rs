//! Core of the envsec secrets store: key material, envelope codec, the
//! AES-256-GCM engine, and the startup loader that feeds decrypted
//! configuration into the process environment.
//!
//! Everything here is synchronous and in-memory; the only file I/O is the
//! loader reading a secrets file at startup. Callers (the backend at boot,
//! the `envsec` CLI) compose these pieces and never parse envelopes
//! themselves.

pub mod dotenv;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod key;
pub mod loader;
pub mod values;

pub use envelope::{Envelope, ENVELOPE_VERSION};
pub use error::SecretsError;
pub use key::Key;
pub use loader::{EnvSink, LoaderPaths, ProcessEnv, SecretsSource};
