use std::fmt;
use std::sync::Arc;

use crate::attributes::{resolve_label, EncryptedStreamAttributes, StreamLabelFn};
use crate::error::ConfigError;
use crate::key::StreamLabel;
use crate::params::{
    KeyProvider, PlayreadyEncryptionParams, RawKeyEncryptionParams, WidevineEncryptionParams,
};
use crate::scheme::ProtectionScheme;

/// Crypto period duration meaning "no key rotation".
pub const NO_KEY_ROTATION: f64 = 0.0;

/// Key provider selection for encryption, with the selected provider's
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EncryptionProvider {
    /// Do not encrypt.
    #[default]
    None,
    Widevine(WidevineEncryptionParams),
    Playready(PlayreadyEncryptionParams),
    RawKey(RawKeyEncryptionParams),
}

impl EncryptionProvider {
    pub fn key_provider(&self) -> KeyProvider {
        match self {
            EncryptionProvider::None => KeyProvider::None,
            EncryptionProvider::Widevine(_) => KeyProvider::Widevine,
            EncryptionProvider::Playready(_) => KeyProvider::Playready,
            EncryptionProvider::RawKey(_) => KeyProvider::RawKey,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            EncryptionProvider::None => Ok(()),
            EncryptionProvider::Widevine(params) => params.validate(),
            EncryptionProvider::Playready(params) => params.validate(),
            EncryptionProvider::RawKey(params) => params.validate(),
        }
    }
}

/// Encryption parameters for a packaging job.
///
/// Built once per job and read by every stream worker; the type is
/// `Send + Sync` and cheap to clone.
#[derive(Clone)]
pub struct EncryptionParams {
    /// Key provider and its parameters.
    pub provider: EncryptionProvider,
    /// Duration of unencrypted media at the start of the content.
    pub clear_lead_in_seconds: f64,
    /// Protection scheme, one of cenc, cbc1, cens or cbcs.
    pub protection_scheme: ProtectionScheme,
    /// Crypto period duration. A positive value enables key rotation, which
    /// the key provider must support.
    pub crypto_period_duration_in_seconds: f64,
    /// Subsample encryption for VP9.
    pub vp9_subsample_encryption: bool,
    /// Assigns stream labels. Every stream gets the default label when unset.
    pub stream_label_func: Option<Arc<dyn StreamLabelFn>>,
}

impl Default for EncryptionParams {
    fn default() -> Self {
        Self {
            provider: EncryptionProvider::None,
            clear_lead_in_seconds: 0.0,
            protection_scheme: ProtectionScheme::CENC,
            crypto_period_duration_in_seconds: NO_KEY_ROTATION,
            vp9_subsample_encryption: true,
            stream_label_func: None,
        }
    }
}

impl EncryptionParams {
    /// Parameters using `provider` and default values for everything else.
    pub fn new(provider: EncryptionProvider) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    /// Set the stream label function.
    pub fn with_stream_label_func<F>(mut self, func: F) -> Self
    where
        F: StreamLabelFn + 'static,
    {
        self.stream_label_func = Some(Arc::new(func));
        self
    }

    pub fn key_provider(&self) -> KeyProvider {
        self.provider.key_provider()
    }

    pub fn key_rotation_enabled(&self) -> bool {
        self.crypto_period_duration_in_seconds > NO_KEY_ROTATION
    }

    /// Check the parameters. Nothing is modified.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        if let Err(err) = &result {
            debug!("Encryption parameters rejected: {}", err);
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        check_duration("clear_lead_in_seconds", self.clear_lead_in_seconds)?;
        check_duration(
            "crypto_period_duration_in_seconds",
            self.crypto_period_duration_in_seconds,
        )?;

        if !self.protection_scheme.is_known() {
            return Err(ConfigError::InvalidProtectionScheme {
                scheme: self.protection_scheme.to_string(),
            });
        }

        let provider = self.key_provider();
        if self.key_rotation_enabled() && !provider.supports_key_rotation() {
            return Err(ConfigError::UnsupportedRotation { provider });
        }

        self.provider.validate()
    }

    /// Resolve the stream label of a stream with the configured label
    /// function, or the default one.
    pub fn resolve_label(&self, attributes: &EncryptedStreamAttributes) -> StreamLabel {
        resolve_label(attributes, self.stream_label_func.as_deref())
    }
}

impl fmt::Debug for EncryptionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionParams")
            .field("provider", &self.provider)
            .field("clear_lead_in_seconds", &self.clear_lead_in_seconds)
            .field("protection_scheme", &format_args!("{}", self.protection_scheme))
            .field(
                "crypto_period_duration_in_seconds",
                &self.crypto_period_duration_in_seconds,
            )
            .field("vp9_subsample_encryption", &self.vp9_subsample_encryption)
            .field(
                "stream_label_func",
                &self.stream_label_func.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

fn check_duration(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration { field, value })
    }
}
