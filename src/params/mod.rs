//! Encryption and decryption parameters.
//!
//! The top-level [`EncryptionParams`] and [`DecryptionParams`] select exactly
//! one key provider through a tagged union, so only the parameters of the
//! selected provider exist. Provider-independent knobs (protection scheme,
//! clear lead, key rotation) live next to the union.

use std::fmt;

mod decryption;
mod encryption;
mod playready;
mod raw_key;
mod widevine;

pub use decryption::{DecryptionParams, DecryptionProvider};
pub use encryption::{EncryptionParams, EncryptionProvider, NO_KEY_ROTATION};
pub use playready::{PlayreadyEncryptionParams, PlayreadyKeySource};
pub(crate) use raw_key::validate_key_map;
pub use raw_key::{RawKeyDecryptionParams, RawKeyEncryptionParams};
pub use widevine::{WidevineDecryptionParams, WidevineEncryptionParams};

/// Encryption / decryption key providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum KeyProvider {
    /// No key provider: streams are left as they are.
    #[default]
    None,
    Widevine,
    Playready,
    RawKey,
}

impl KeyProvider {
    /// Whether the provider can supply a new key every crypto period.
    pub fn supports_key_rotation(self) -> bool {
        matches!(self, KeyProvider::Widevine | KeyProvider::RawKey)
    }
}

impl fmt::Display for KeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyProvider::None => "None",
            KeyProvider::Widevine => "Widevine",
            KeyProvider::Playready => "PlayReady",
            KeyProvider::RawKey => "RawKey",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DecryptionParams, EncryptionParams, KeyProvider};

    fn assert_send_sync<T: Send + Sync + Clone>() {}

    #[test]
    fn params_can_be_shared_across_workers() {
        assert_send_sync::<EncryptionParams>();
        assert_send_sync::<DecryptionParams>();
    }

    #[test]
    fn rotation_support() {
        assert!(KeyProvider::Widevine.supports_key_rotation());
        assert!(KeyProvider::RawKey.supports_key_rotation());
        assert!(!KeyProvider::Playready.supports_key_rotation());
        assert!(!KeyProvider::None.supports_key_rotation());
    }
}
