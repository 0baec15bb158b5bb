//! Key sources: the capability every key provider backend implements.
//!
//! A source delivers the [`KeyMap`] for a job. Raw key sources hand back the
//! keys already present in the parameters. Widevine and PlayReady key server
//! sources live outside this crate; they implement [`KeySource`] and report
//! their failures as [`ProviderError`]s, which are passed through unchanged.

use crate::error::ProviderError;
use crate::key::{KeyMap, StreamLabel};
use crate::params::{
    KeyProvider, PlayreadyEncryptionParams, RawKeyDecryptionParams, RawKeyEncryptionParams,
};

/// Supplies the key map of a key provider.
pub trait KeySource: Send + Sync {
    /// Backend this source belongs to.
    fn key_provider(&self) -> KeyProvider;

    /// Fetch the keys. May perform network I/O; timeouts and retries are the
    /// implementation's business.
    fn fetch_keys(&self) -> Result<KeyMap, ProviderError>;
}

/// Key source over keys supplied directly by the caller.
#[derive(Debug, Clone)]
pub struct RawKeySource {
    key_map: KeyMap,
}

impl RawKeySource {
    pub fn new(key_map: KeyMap) -> Self {
        Self { key_map }
    }
}

impl From<&RawKeyEncryptionParams> for RawKeySource {
    fn from(params: &RawKeyEncryptionParams) -> Self {
        Self::new(params.key_map.clone())
    }
}

impl From<&RawKeyDecryptionParams> for RawKeySource {
    fn from(params: &RawKeyDecryptionParams) -> Self {
        Self::new(params.key_map.clone())
    }
}

impl KeySource for RawKeySource {
    fn key_provider(&self) -> KeyProvider {
        KeyProvider::RawKey
    }

    fn fetch_keys(&self) -> Result<KeyMap, ProviderError> {
        Ok(self.key_map.clone())
    }
}

/// Key source for PlayReady parameters in raw key mode. The raw key becomes
/// the default key pair.
#[derive(Debug, Clone)]
pub struct PlayreadyRawKeySource {
    params: PlayreadyEncryptionParams,
}

impl PlayreadyRawKeySource {
    pub fn new(params: PlayreadyEncryptionParams) -> Self {
        Self { params }
    }
}

impl KeySource for PlayreadyRawKeySource {
    fn key_provider(&self) -> KeyProvider {
        KeyProvider::Playready
    }

    fn fetch_keys(&self) -> Result<KeyMap, ProviderError> {
        let pair = self.params.raw_key_pair().ok_or_else(|| {
            ProviderError::new(
                KeyProvider::Playready,
                "parameters are not in raw key mode; keys must come from the key server",
            )
        })?;
        let mut map = KeyMap::new();
        map.insert(StreamLabel::default(), pair);
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeySource, PlayreadyRawKeySource, RawKeySource};
    use crate::key::{KeyMap, KeyPair, StreamLabel};
    use crate::params::{KeyProvider, PlayreadyEncryptionParams, RawKeyDecryptionParams};

    #[test]
    fn raw_key_source_is_identity() {
        let map = KeyMap::new()
            .with("", KeyPair::new(vec![1; 16], vec![2; 16]))
            .with("audio", KeyPair::new(vec![3; 16], vec![4; 16]));
        let source = RawKeySource::from(&RawKeyDecryptionParams::new(map.clone()));
        assert_eq!(source.key_provider(), KeyProvider::RawKey);
        assert_eq!(source.fetch_keys().expect("fetch keys"), map);
    }

    #[test]
    fn playready_raw_key_becomes_default_pair() {
        let source =
            PlayreadyRawKeySource::new(PlayreadyEncryptionParams::raw(vec![5; 16], vec![6; 16]));
        let map = source.fetch_keys().expect("fetch keys");
        assert_eq!(map.len(), 1);
        let pair = map
            .lookup(&StreamLabel::new("anything"))
            .expect("default pair");
        assert_eq!(pair.key_id, vec![5; 16]);
    }

    #[test]
    fn playready_server_mode_cannot_be_fetched_locally() {
        let source = PlayreadyRawKeySource::new(PlayreadyEncryptionParams::server(
            "https://playready.example.com",
            "program",
        ));
        let err = source.fetch_keys().expect_err("server mode");
        assert_eq!(err.provider, KeyProvider::Playready);
    }
}
