//! Error types for rspackager-crypto.
//!
//! Configuration problems are reported as [`ConfigError`] before any stream is
//! touched. Per-stream failures are [`RuntimeError`]s. Failures coming out of a
//! key source are wrapped, untouched, in [`ProviderError`].

use thiserror::Error;

use crate::key::StreamLabel;
use crate::params::KeyProvider;

/// Errors raised while validating encryption or decryption parameters.
///
/// All of these are fatal for the packaging job.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The provider selector does not agree with the supplied parameters.
    #[error("Invalid key provider: {reason}")]
    InvalidProvider { reason: String },

    /// A field required by the selected provider is empty.
    #[error("{provider} parameters are missing required field `{field}`")]
    MissingField {
        provider: KeyProvider,
        field: &'static str,
    },

    /// The Widevine signer cannot authenticate a request.
    #[error("Invalid Widevine signer: {reason}")]
    InvalidSigner { reason: String },

    /// PlayReady server-fetch and raw-key fields are both populated.
    #[error("PlayReady parameters mix key server fields with a raw key_id/key")]
    AmbiguousMode,

    /// Neither PlayReady acquisition mode is fully populated.
    #[error("Incomplete PlayReady parameters: {reason}")]
    IncompleteMode { reason: String },

    /// The key map of a raw key provider has no entries.
    #[error("{provider} key_map must not be empty")]
    EmptyKeyMap { provider: KeyProvider },

    /// The protection scheme is not cenc, cbc1, cens or cbcs.
    #[error("Unsupported protection scheme {scheme} (supported: cenc, cbc1, cens, cbcs)")]
    InvalidProtectionScheme { scheme: String },

    /// Key rotation was requested from a provider that cannot rotate keys.
    #[error("Key rotation is not supported by key provider {provider}")]
    UnsupportedRotation { provider: KeyProvider },

    /// A duration knob is negative or not a number.
    #[error("`{field}` must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },

    /// The raw key IV has an unusable length.
    #[error("Invalid IV length: expected 8 or 16 bytes, got {len}")]
    InvalidIv { len: usize },

    /// A key pair in a key map is malformed.
    #[error("Invalid key pair for stream label {label:?}: {reason}")]
    InvalidKeyPair { label: StreamLabel, reason: String },
}

/// Errors raised while resolving keys for an individual stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Neither the label nor the default (empty) label has a key pair.
    #[error("No key pair for stream label {label:?} and no default key pair")]
    NoKeyForLabel { label: StreamLabel },

    /// Keys were requested before the key source delivered them.
    #[error("Keys for key provider {provider} have not been loaded")]
    KeysNotLoaded { provider: KeyProvider },
}

/// Opaque failure reported by a key source (license server, key store).
#[derive(Debug, Error)]
#[error("{provider} key source failed: {source}")]
pub struct ProviderError {
    /// Backend that produced the failure.
    pub provider: KeyProvider,
    /// Underlying error, passed through as is.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ProviderError {
    /// Wrap a backend failure.
    pub fn new<E>(provider: KeyProvider, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            provider,
            source: source.into(),
        }
    }
}

/// Main error type for rspackager-crypto operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Parameter validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Per-stream key resolution failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A key source failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration could not be parsed.
    #[cfg(feature = "config")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for rspackager-crypto operations.
pub type Result<T> = std::result::Result<T, Error>;
