//! rspackager-crypto - encryption / decryption parameters for media packaging.
//!
//! This crate provides:
//! - Key provider selection (Widevine, PlayReady, raw key) as tagged unions.
//! - Parameter validation before any stream is touched.
//! - Stream label resolution and key map lookup with a default key pair.
//! - Stream metadata and the attributes used to label encrypted streams.
//! - Optional YAML job configuration.
//!
//! Feature flags:
//! - `config`: enable YAML configuration loading (default).
//! - `cli`: enable the CLI binary helpers.
//! - `tracing`: enable tracing macros and subscriber.
#![allow(clippy::result_large_err)]

#[macro_use]
mod macros;

/// Encrypted stream attributes and stream label functions.
pub mod attributes;
/// Validated encryptor / decryptor handles.
pub mod crypter;
/// Common error types and Result alias.
pub mod error;
/// Key pairs, stream labels and key maps.
pub mod key;
/// Encryption and decryption parameters per key provider.
pub mod params;
/// Protection scheme fourCCs.
pub mod scheme;
/// Widevine request signer.
pub mod signer;
/// Key source capability.
pub mod source;
/// Elementary stream metadata.
pub mod stream_info;

/// YAML job configuration (feature: `config`).
#[cfg(feature = "config")]
pub mod config;

pub use attributes::{EncryptedStreamAttributes, StreamLabelFn};
pub use crypter::{Decryptor, Encryptor};
pub use error::{ConfigError, Error, ProviderError, Result, RuntimeError};
pub use key::{KeyMap, KeyPair, StreamLabel};
pub use params::{DecryptionParams, EncryptionParams, KeyProvider};
pub use scheme::ProtectionScheme;
pub use source::KeySource;
