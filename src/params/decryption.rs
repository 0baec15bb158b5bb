use crate::error::ConfigError;
use crate::params::{KeyProvider, RawKeyDecryptionParams, WidevineDecryptionParams};

/// Key provider selection for decryption. PlayReady cannot decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DecryptionProvider {
    /// Do not decrypt.
    #[default]
    None,
    Widevine(WidevineDecryptionParams),
    RawKey(RawKeyDecryptionParams),
}

impl DecryptionProvider {
    pub fn key_provider(&self) -> KeyProvider {
        match self {
            DecryptionProvider::None => KeyProvider::None,
            DecryptionProvider::Widevine(_) => KeyProvider::Widevine,
            DecryptionProvider::RawKey(_) => KeyProvider::RawKey,
        }
    }
}

/// Decryption parameters for a packaging job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecryptionParams {
    pub provider: DecryptionProvider,
}

impl DecryptionParams {
    pub fn new(provider: DecryptionProvider) -> Self {
        Self { provider }
    }

    pub fn key_provider(&self) -> KeyProvider {
        self.provider.key_provider()
    }

    /// Check the parameters. Nothing is modified.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = match &self.provider {
            DecryptionProvider::None => Ok(()),
            DecryptionProvider::Widevine(params) => params.validate(),
            DecryptionProvider::RawKey(params) => params.validate(),
        };
        if let Err(err) = &result {
            debug!("Decryption parameters rejected: {}", err);
        }
        result
    }
}
