use crate::error::ConfigError;
use crate::params::KeyProvider;
use crate::signer::WidevineSigner;

/// Widevine encryption parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidevineEncryptionParams {
    /// Widevine license / key server URL.
    pub key_server_url: String,
    /// Also emit a v1 PSSH box for the common system ID.
    pub include_common_pssh: bool,
    /// Content identifier.
    pub content_id: Vec<u8>,
    /// Name of a stored policy specifying the content rights.
    pub policy: String,
    /// Signer credential for the key server.
    pub signer: WidevineSigner,
    /// Group identifier; licenses belong to this group when set.
    pub group_id: Vec<u8>,
}

impl WidevineEncryptionParams {
    pub fn new(key_server_url: impl Into<String>, signer: WidevineSigner) -> Self {
        Self {
            key_server_url: key_server_url.into(),
            signer,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.key_server_url, &self.signer)
    }
}

/// Widevine decryption parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidevineDecryptionParams {
    /// Widevine license / key server URL.
    pub key_server_url: String,
    /// Signer credential for the key server.
    pub signer: WidevineSigner,
}

impl WidevineDecryptionParams {
    pub fn new(key_server_url: impl Into<String>, signer: WidevineSigner) -> Self {
        Self {
            key_server_url: key_server_url.into(),
            signer,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.key_server_url, &self.signer)
    }
}

fn validate_server(key_server_url: &str, signer: &WidevineSigner) -> Result<(), ConfigError> {
    if key_server_url.trim().is_empty() {
        return Err(ConfigError::MissingField {
            provider: KeyProvider::Widevine,
            field: "key_server_url",
        });
    }
    signer.validate()
}
