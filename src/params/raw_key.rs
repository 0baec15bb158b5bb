use crate::error::{ConfigError, RuntimeError};
use crate::key::{KeyMap, KeyPair, StreamLabel};
use crate::params::KeyProvider;

/// Raw key encryption parameters, i.e. with the keys supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawKeyEncryptionParams {
    /// Fixed IV. A random IV is generated when unset; only meant for tests.
    pub iv: Option<Vec<u8>>,
    /// One or more concatenated PSSH boxes to inject. A common system PSSH is
    /// generated when unset.
    pub pssh: Option<Vec<u8>>,
    /// Key pairs per stream label. The empty label holds the default pair.
    pub key_map: KeyMap,
}

impl RawKeyEncryptionParams {
    pub fn new(key_map: KeyMap) -> Self {
        Self {
            key_map,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(iv) = &self.iv {
            if iv.len() != 8 && iv.len() != 16 {
                return Err(ConfigError::InvalidIv { len: iv.len() });
            }
        }
        validate_key_map(KeyProvider::RawKey, &self.key_map)
    }

    pub fn lookup(&self, label: &StreamLabel) -> Result<&KeyPair, RuntimeError> {
        self.key_map.lookup(label)
    }
}

/// Raw key decryption parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawKeyDecryptionParams {
    /// Key pairs per stream label. The empty label holds the default pair.
    pub key_map: KeyMap,
}

impl RawKeyDecryptionParams {
    pub fn new(key_map: KeyMap) -> Self {
        Self { key_map }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_key_map(KeyProvider::RawKey, &self.key_map)
    }

    pub fn lookup(&self, label: &StreamLabel) -> Result<&KeyPair, RuntimeError> {
        self.key_map.lookup(label)
    }
}

/// Check that `key_map` has entries and only AES-128 sized pairs.
pub(crate) fn validate_key_map(
    provider: KeyProvider,
    key_map: &KeyMap,
) -> Result<(), ConfigError> {
    if key_map.is_empty() {
        return Err(ConfigError::EmptyKeyMap { provider });
    }
    for (label, pair) in key_map {
        if let Some(reason) = pair.check_sizes() {
            return Err(ConfigError::InvalidKeyPair {
                label: label.clone(),
                reason,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RawKeyDecryptionParams, RawKeyEncryptionParams};
    use crate::error::ConfigError;
    use crate::key::{KeyMap, KeyPair, StreamLabel};
    use crate::params::KeyProvider;

    fn key_map() -> KeyMap {
        KeyMap::new()
            .with("", KeyPair::new(vec![0xA; 16], vec![0xB; 16]))
            .with("video", KeyPair::new(vec![0xC; 16], vec![0xD; 16]))
    }

    #[test]
    fn empty_key_map_is_rejected() {
        assert_eq!(
            RawKeyEncryptionParams::default().validate(),
            Err(ConfigError::EmptyKeyMap {
                provider: KeyProvider::RawKey
            })
        );
        assert!(matches!(
            RawKeyDecryptionParams::default().validate(),
            Err(ConfigError::EmptyKeyMap { .. })
        ));
    }

    #[test]
    fn iv_must_be_8_or_16_bytes() {
        let mut params = RawKeyEncryptionParams::new(key_map());
        for (len, ok) in [(8, true), (16, true), (12, false), (0, false)] {
            params.iv = Some(vec![0; len]);
            assert_eq!(params.validate().is_ok(), ok, "iv length {}", len);
        }
    }

    #[test]
    fn malformed_pair_names_its_label() {
        let params = RawKeyEncryptionParams::new(
            key_map().with("audio", KeyPair::new(vec![1; 4], vec![2; 16])),
        );
        match params.validate() {
            Err(ConfigError::InvalidKeyPair { label, .. }) => assert_eq!(label.as_str(), "audio"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn decryption_lookup_matches_encryption_lookup() {
        let enc = RawKeyEncryptionParams::new(key_map());
        let dec = RawKeyDecryptionParams::new(key_map());

        for label in ["", "video", "audio", "text"] {
            let label = StreamLabel::new(label);
            assert_eq!(enc.lookup(&label), dec.lookup(&label));
        }

        let no_default = KeyMap::new().with("video", KeyPair::new(vec![1; 16], vec![2; 16]));
        let enc = RawKeyEncryptionParams::new(no_default.clone());
        let dec = RawKeyDecryptionParams::new(no_default);
        let audio = StreamLabel::new("audio");
        assert_eq!(enc.lookup(&audio), dec.lookup(&audio));
        assert!(dec.lookup(&audio).is_err());
    }
}
