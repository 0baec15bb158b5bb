//! Per-job encryptor and decryptor handles.
//!
//! Constructing either handle validates the parameters first, so a job with
//! a bad configuration never touches a stream. The handle then owns the key
//! map and resolves the key pair of each stream: label first, then lookup.

use crate::attributes::EncryptedStreamAttributes;
use crate::error::{ConfigError, Error, RuntimeError};
use crate::key::{KeyMap, KeyPair, StreamLabel};
use crate::params::{
    validate_key_map, DecryptionParams, DecryptionProvider, EncryptionParams, EncryptionProvider,
    KeyProvider,
};
use crate::source::{KeySource, PlayreadyRawKeySource, RawKeySource};
use crate::stream_info::StreamInfo;

/// Validated encryption configuration of a job, with its keys.
#[derive(Debug, Clone)]
pub struct Encryptor {
    params: EncryptionParams,
    key_map: Option<KeyMap>,
}

impl Encryptor {
    /// Validate `params` and load keys the parameters carry themselves (raw
    /// key, PlayReady raw key mode). Keys of key server providers are loaded
    /// later with [`Encryptor::load_keys`].
    pub fn new(params: EncryptionParams) -> Result<Self, ConfigError> {
        if params.key_provider() == KeyProvider::None {
            return Err(ConfigError::InvalidProvider {
                reason: "cannot create an encryptor without a key provider".to_string(),
            });
        }
        params.validate()?;

        let local: Option<Box<dyn KeySource>> = match &params.provider {
            EncryptionProvider::RawKey(raw) => Some(Box::new(RawKeySource::from(raw))),
            EncryptionProvider::Playready(pr) if pr.raw_key_pair().is_some() => {
                Some(Box::new(PlayreadyRawKeySource::new(pr.clone())))
            }
            _ => None,
        };
        let key_map = match local {
            Some(source) => match source.fetch_keys() {
                Ok(key_map) => Some(key_map),
                Err(err) => {
                    warn!("Local keys could not be loaded, keys pending: {}", err);
                    None
                }
            },
            None => None,
        };

        info!(
            "Created {} encryptor (scheme {}, keys {})",
            params.key_provider(),
            params.protection_scheme,
            if key_map.is_some() { "loaded" } else { "pending" }
        );
        Ok(Self { params, key_map })
    }

    pub fn params(&self) -> &EncryptionParams {
        &self.params
    }

    pub fn key_provider(&self) -> KeyProvider {
        self.params.key_provider()
    }

    pub fn keys_loaded(&self) -> bool {
        self.key_map.is_some()
    }

    /// Fetch keys from an external source, replacing any loaded keys.
    ///
    /// The source must belong to this encryptor's key provider and deliver a
    /// non-empty map of 16-byte key ids and keys. On any failure the keys
    /// loaded before are kept.
    pub fn load_keys(&mut self, source: &dyn KeySource) -> Result<(), Error> {
        let key_map = fetch_checked(self.key_provider(), source)?;
        debug!(
            "Loaded {} key pair(s) from {} key source",
            key_map.len(),
            source.key_provider()
        );
        self.key_map = Some(key_map);
        Ok(())
    }

    pub fn stream_label(&self, attributes: &EncryptedStreamAttributes) -> StreamLabel {
        self.params.resolve_label(attributes)
    }

    /// Key pair for a stream described by `attributes`.
    pub fn key_for_stream(
        &self,
        attributes: &EncryptedStreamAttributes,
    ) -> Result<&KeyPair, RuntimeError> {
        let key_map = self.key_map.as_ref().ok_or(RuntimeError::KeysNotLoaded {
            provider: self.key_provider(),
        })?;
        key_map.lookup(&self.stream_label(attributes))
    }

    pub fn key_for_stream_info(&self, info: &StreamInfo) -> Result<&KeyPair, RuntimeError> {
        self.key_for_stream(&info.encrypted_stream_attributes())
    }
}

/// Validated decryption configuration of a job, with its keys.
#[derive(Debug, Clone)]
pub struct Decryptor {
    params: DecryptionParams,
    key_map: Option<KeyMap>,
}

impl Decryptor {
    pub fn new(params: DecryptionParams) -> Result<Self, ConfigError> {
        if params.key_provider() == KeyProvider::None {
            return Err(ConfigError::InvalidProvider {
                reason: "cannot create a decryptor without a key provider".to_string(),
            });
        }
        params.validate()?;

        let key_map = match &params.provider {
            DecryptionProvider::RawKey(raw) => Some(raw.key_map.clone()),
            _ => None,
        };
        info!("Created {} decryptor", params.key_provider());
        Ok(Self { params, key_map })
    }

    pub fn params(&self) -> &DecryptionParams {
        &self.params
    }

    pub fn key_provider(&self) -> KeyProvider {
        self.params.key_provider()
    }

    pub fn keys_loaded(&self) -> bool {
        self.key_map.is_some()
    }

    /// Same checks as [`Encryptor::load_keys`].
    pub fn load_keys(&mut self, source: &dyn KeySource) -> Result<(), Error> {
        self.key_map = Some(fetch_checked(self.key_provider(), source)?);
        Ok(())
    }

    /// Key pair for the stream carrying `label`.
    pub fn key_for_label(&self, label: &StreamLabel) -> Result<&KeyPair, RuntimeError> {
        self.key_map
            .as_ref()
            .ok_or(RuntimeError::KeysNotLoaded {
                provider: self.key_provider(),
            })?
            .lookup(label)
    }

    /// Key pair for the stream with key id `key_id`, if any loaded pair has it.
    pub fn key_for_key_id(&self, key_id: &[u8]) -> Option<&KeyPair> {
        self.key_map
            .as_ref()?
            .iter()
            .map(|(_, pair)| pair)
            .find(|pair| pair.key_id == key_id)
    }
}

fn fetch_checked(provider: KeyProvider, source: &dyn KeySource) -> Result<KeyMap, Error> {
    if source.key_provider() != provider {
        return Err(ConfigError::InvalidProvider {
            reason: format!(
                "cannot load keys from a {} key source into a {} handle",
                source.key_provider(),
                provider
            ),
        }
        .into());
    }
    let key_map = source.fetch_keys()?;
    validate_key_map(provider, &key_map)?;
    Ok(key_map)
}

#[cfg(test)]
mod tests {
    use super::{Decryptor, Encryptor};
    use crate::attributes::EncryptedStreamAttributes;
    use crate::error::{ConfigError, Error, ProviderError, RuntimeError};
    use crate::key::{KeyMap, KeyPair, StreamLabel};
    use crate::params::{
        DecryptionParams, DecryptionProvider, EncryptionParams, EncryptionProvider, KeyProvider,
        PlayreadyEncryptionParams, RawKeyDecryptionParams, RawKeyEncryptionParams,
        WidevineEncryptionParams,
    };
    use crate::signer::WidevineSigner;
    use crate::source::KeySource;
    use crate::stream_info::{AudioStreamInfo, Codec, StreamDetails, StreamInfo};

    struct FakeLicenseServer {
        fail: bool,
    }

    impl KeySource for FakeLicenseServer {
        fn key_provider(&self) -> KeyProvider {
            KeyProvider::Widevine
        }

        fn fetch_keys(&self) -> Result<KeyMap, ProviderError> {
            if self.fail {
                return Err(ProviderError::new(KeyProvider::Widevine, "HTTP 403"));
            }
            Ok(KeyMap::new().with("", KeyPair::new(vec![7; 16], vec![8; 16])))
        }
    }

    struct StaticKeySource {
        provider: KeyProvider,
        key_map: KeyMap,
    }

    impl KeySource for StaticKeySource {
        fn key_provider(&self) -> KeyProvider {
            self.provider
        }

        fn fetch_keys(&self) -> Result<KeyMap, ProviderError> {
            Ok(self.key_map.clone())
        }
    }

    fn raw_key_encryptor() -> Encryptor {
        let params = EncryptionParams::new(EncryptionProvider::RawKey(
            RawKeyEncryptionParams::new(
                KeyMap::new().with("", KeyPair::new(vec![0xA; 16], vec![0xB; 16])),
            ),
        ));
        Encryptor::new(params).expect("encryptor")
    }

    fn widevine_params() -> EncryptionParams {
        EncryptionParams::new(EncryptionProvider::Widevine(WidevineEncryptionParams::new(
            "https://license.uat.widevine.com/cenc/getcontentkey/widevine_test",
            WidevineSigner::aes("widevine_test", vec![1; 32], vec![2; 16]),
        )))
    }

    #[test]
    fn invalid_params_never_build_an_encryptor() {
        let params = EncryptionParams::new(EncryptionProvider::RawKey(
            RawKeyEncryptionParams::default(),
        ));
        assert!(matches!(
            Encryptor::new(params),
            Err(ConfigError::EmptyKeyMap { .. })
        ));
        assert!(matches!(
            Encryptor::new(EncryptionParams::default()),
            Err(ConfigError::InvalidProvider { .. })
        ));
    }

    #[test]
    fn raw_key_encryptor_resolves_per_stream() {
        let map = KeyMap::new()
            .with("", KeyPair::new(vec![0xA; 16], vec![0xB; 16]))
            .with("video", KeyPair::new(vec![0xC; 16], vec![0xD; 16]));
        let params = EncryptionParams::new(EncryptionProvider::RawKey(
            RawKeyEncryptionParams::new(map),
        ))
        .with_stream_label_func(|attrs: &EncryptedStreamAttributes| match attrs {
            EncryptedStreamAttributes::Video(_) => StreamLabel::new("video"),
            _ => StreamLabel::default(),
        });
        let encryptor = Encryptor::new(params).expect("encryptor");
        assert!(encryptor.keys_loaded());

        let video = encryptor
            .key_for_stream(&EncryptedStreamAttributes::video(1920, 1080, 30.0, 8))
            .expect("video key");
        assert_eq!(video.key, vec![0xD; 16]);

        let audio_info = StreamInfo::new(
            StreamDetails::Audio(AudioStreamInfo {
                num_channels: 2,
                ..Default::default()
            }),
            2,
            44100,
            441000,
            Codec::Aac,
            "mp4a.40.2",
            &[],
            "en",
            false,
        );
        let audio = encryptor.key_for_stream_info(&audio_info).expect("audio key");
        assert_eq!(audio.key, vec![0xB; 16]);
    }

    #[test]
    fn server_provider_keys_are_pending_until_loaded() {
        let mut encryptor = Encryptor::new(widevine_params()).expect("encryptor");
        assert!(!encryptor.keys_loaded());
        assert_eq!(
            encryptor.key_for_stream(&EncryptedStreamAttributes::audio(2)),
            Err(RuntimeError::KeysNotLoaded {
                provider: KeyProvider::Widevine
            })
        );

        let err = encryptor
            .load_keys(&FakeLicenseServer { fail: true })
            .expect_err("server failure");
        assert!(err.to_string().contains("HTTP 403"));
        assert!(!encryptor.keys_loaded());

        encryptor
            .load_keys(&FakeLicenseServer { fail: false })
            .expect("load keys");
        let pair = encryptor
            .key_for_stream(&EncryptedStreamAttributes::audio(2))
            .expect("key");
        assert_eq!(pair.key_id, vec![7; 16]);
    }

    #[test]
    fn playready_raw_mode_loads_keys_immediately() {
        let params = EncryptionParams::new(EncryptionProvider::Playready(
            PlayreadyEncryptionParams::raw(vec![3; 16], vec![4; 16]),
        ));
        let encryptor = Encryptor::new(params).expect("encryptor");
        let pair = encryptor
            .key_for_stream(&EncryptedStreamAttributes::Unknown)
            .expect("key");
        assert_eq!(pair.key, vec![4; 16]);
    }

    #[test]
    fn decryptor_uses_same_lookup() {
        let map = KeyMap::new().with("video", KeyPair::new(vec![1; 16], vec![2; 16]));
        let decryptor = Decryptor::new(DecryptionParams::new(DecryptionProvider::RawKey(
            RawKeyDecryptionParams::new(map),
        )))
        .expect("decryptor");

        assert_eq!(
            decryptor.key_for_label(&StreamLabel::new("audio")),
            Err(RuntimeError::NoKeyForLabel {
                label: StreamLabel::new("audio")
            })
        );
        assert!(decryptor.key_for_label(&StreamLabel::new("video")).is_ok());
        assert!(decryptor.key_for_key_id(&[1; 16]).is_some());
        assert!(decryptor.key_for_key_id(&[9; 16]).is_none());
        assert!(matches!(
            Decryptor::new(DecryptionParams::default()),
            Err(ConfigError::InvalidProvider { .. })
        ));
    }

    #[test]
    fn keys_from_another_provider_are_rejected() {
        let mut encryptor = raw_key_encryptor();
        let source = StaticKeySource {
            provider: KeyProvider::Playready,
            key_map: KeyMap::new().with("", KeyPair::new(vec![9; 16], vec![9; 16])),
        };
        assert!(matches!(
            encryptor.load_keys(&source),
            Err(Error::Config(ConfigError::InvalidProvider { .. }))
        ));

        let pair = encryptor
            .key_for_stream(&EncryptedStreamAttributes::audio(2))
            .expect("previous key");
        assert_eq!(pair.key_id, vec![0xA; 16]);
    }

    #[test]
    fn malformed_fetched_keys_are_rejected() {
        let mut encryptor = raw_key_encryptor();
        let short = StaticKeySource {
            provider: KeyProvider::RawKey,
            key_map: KeyMap::new().with("", KeyPair::new(vec![9; 4], vec![9; 3])),
        };
        match encryptor.load_keys(&short) {
            Err(Error::Config(ConfigError::InvalidKeyPair { label, .. })) => {
                assert!(label.is_default())
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let empty = StaticKeySource {
            provider: KeyProvider::RawKey,
            key_map: KeyMap::new(),
        };
        assert!(matches!(
            encryptor.load_keys(&empty),
            Err(Error::Config(ConfigError::EmptyKeyMap {
                provider: KeyProvider::RawKey
            }))
        ));

        let pair = encryptor
            .key_for_stream(&EncryptedStreamAttributes::Unknown)
            .expect("previous key");
        assert_eq!(pair.key, vec![0xB; 16]);
    }

    #[test]
    fn decryptor_load_keys_checks_source() {
        let map = KeyMap::new().with("", KeyPair::new(vec![1; 16], vec![2; 16]));
        let mut decryptor = Decryptor::new(DecryptionParams::new(DecryptionProvider::RawKey(
            RawKeyDecryptionParams::new(map),
        )))
        .expect("decryptor");

        let widevine = StaticKeySource {
            provider: KeyProvider::Widevine,
            key_map: KeyMap::new().with("", KeyPair::new(vec![3; 16], vec![4; 16])),
        };
        assert!(decryptor.load_keys(&widevine).is_err());

        let short = StaticKeySource {
            provider: KeyProvider::RawKey,
            key_map: KeyMap::new().with("", KeyPair::new(vec![3; 16], vec![4; 8])),
        };
        assert!(decryptor.load_keys(&short).is_err());
        assert!(decryptor.key_for_key_id(&[1; 16]).is_some());

        let fresh = StaticKeySource {
            provider: KeyProvider::RawKey,
            key_map: KeyMap::new().with("", KeyPair::new(vec![3; 16], vec![4; 16])),
        };
        decryptor.load_keys(&fresh).expect("load keys");
        assert!(decryptor.key_for_key_id(&[3; 16]).is_some());
        assert!(decryptor.key_for_key_id(&[1; 16]).is_none());
    }
}
