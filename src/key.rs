//! Key material: key pairs, stream labels and the label-to-key map.
//!
//! Streams that share a [`StreamLabel`] always share a [`KeyPair`]. The empty
//! label names the default key pair, used for every label that has no entry
//! of its own.

use std::collections::BTreeMap;
use std::fmt;

use uuid::Uuid;

use crate::error::RuntimeError;

/// Length in bytes of an AES-128 content key and of a key id.
pub const KEY_SIZE: usize = 16;

/// A content key and its identifier.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct KeyPair {
    /// Key identifier (KID).
    pub key_id: Vec<u8>,
    /// Raw content key bytes.
    pub key: Vec<u8>,
}

impl KeyPair {
    /// Create a new KeyPair.
    pub fn new(key_id: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            key_id: key_id.into(),
            key: key.into(),
        }
    }

    /// Parse a KeyPair from hex-encoded key id and key.
    pub fn from_hex(key_id: &str, key: &str) -> Result<Self, hex::FromHexError> {
        Ok(Self::new(hex::decode(key_id)?, hex::decode(key)?))
    }

    /// Key id as a UUID, if it is exactly 16 bytes long.
    pub fn key_id_uuid(&self) -> Option<Uuid> {
        Uuid::from_slice(&self.key_id).ok()
    }

    /// Describe why this pair cannot be used for AES-128, if it can't.
    pub(crate) fn check_sizes(&self) -> Option<String> {
        if self.key_id.len() != KEY_SIZE {
            return Some(format!(
                "key_id must be {} bytes, got {}",
                KEY_SIZE,
                self.key_id.len()
            ));
        }
        if self.key.len() != KEY_SIZE {
            return Some(format!(
                "key must be {} bytes, got {}",
                KEY_SIZE,
                self.key.len()
            ));
        }
        None
    }
}

// Key bytes never end up in logs.
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("key_id", &hex::encode(&self.key_id))
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .finish()
    }
}

/// Identifier grouping streams that must use the same key pair.
///
/// The empty label is the default label.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamLabel(String);

impl StreamLabel {
    /// Create a new label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Whether this is the default (empty) label.
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for StreamLabel {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl AsRef<str> for StreamLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Mapping from stream label to key pair.
///
/// Shared by the raw key encryption and decryption parameters, so both sides
/// resolve labels with the exact same fallback rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap(BTreeMap<StreamLabel, KeyPair>);

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key pair, returning the pair previously stored for the label.
    pub fn insert(&mut self, label: impl Into<StreamLabel>, pair: KeyPair) -> Option<KeyPair> {
        self.0.insert(label.into(), pair)
    }

    /// Builder-style [`KeyMap::insert`].
    pub fn with(mut self, label: impl Into<StreamLabel>, pair: KeyPair) -> Self {
        self.insert(label, pair);
        self
    }

    pub fn get(&self, label: &StreamLabel) -> Option<&KeyPair> {
        self.0.get(label)
    }

    /// The default key pair, stored under the empty label.
    pub fn default_pair(&self) -> Option<&KeyPair> {
        self.0.get(&StreamLabel::default())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StreamLabel, &KeyPair)> {
        self.0.iter()
    }

    /// Find the key pair for a stream label.
    ///
    /// An exact match wins. Otherwise the default key pair is used. If there is
    /// no default either, the lookup fails; a key meant for another label is
    /// never substituted.
    pub fn lookup(&self, label: &StreamLabel) -> Result<&KeyPair, RuntimeError> {
        if let Some(pair) = self.0.get(label) {
            trace!("Key map hit for stream label {:?}", label);
            return Ok(pair);
        }

        match self.default_pair() {
            Some(pair) => {
                debug!(
                    "No key pair for stream label {:?}, falling back to the default key pair",
                    label
                );
                Ok(pair)
            }
            None => Err(RuntimeError::NoKeyForLabel {
                label: label.clone(),
            }),
        }
    }
}

impl FromIterator<(StreamLabel, KeyPair)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (StreamLabel, KeyPair)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a KeyMap {
    type Item = (&'a StreamLabel, &'a KeyPair);
    type IntoIter = std::collections::btree_map::Iter<'a, StreamLabel, KeyPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyMap, KeyPair, StreamLabel};
    use crate::error::RuntimeError;

    fn pair(id: u8, key: u8) -> KeyPair {
        KeyPair::new(vec![id; 16], vec![key; 16])
    }

    #[test]
    fn exact_label_wins_over_default() {
        let map = KeyMap::new()
            .with("", pair(0xA, 0xB))
            .with("video", pair(0xC, 0xD));

        let found = map.lookup(&StreamLabel::new("video")).expect("lookup video");
        assert_eq!(found, &pair(0xC, 0xD));
    }

    #[test]
    fn unknown_label_falls_back_to_default() {
        let map = KeyMap::new()
            .with("", pair(0xA, 0xB))
            .with("video", pair(0xC, 0xD));

        let found = map.lookup(&StreamLabel::new("audio")).expect("lookup audio");
        assert_eq!(found, &pair(0xA, 0xB));
    }

    #[test]
    fn missing_label_without_default_fails() {
        let map = KeyMap::new().with("video", pair(0xC, 0xD));

        let err = map
            .lookup(&StreamLabel::new("audio"))
            .expect_err("no default entry");
        assert_eq!(
            err,
            RuntimeError::NoKeyForLabel {
                label: StreamLabel::new("audio")
            }
        );
    }

    #[test]
    fn key_pair_debug_hides_key() {
        let kp = KeyPair::from_hex(
            "eb676abbcb345e96bbcf616630f1a3da",
            "100b6c20940f779a4589152b57d2dacb",
        )
        .expect("valid hex");
        let dbg = format!("{:?}", kp);
        assert!(dbg.contains("eb676abbcb345e96bbcf616630f1a3da"));
        assert!(!dbg.contains("100b6c20940f779a4589152b57d2dacb"));
        assert_eq!(
            kp.key_id_uuid().map(|u| u.to_string()),
            Some("eb676abb-cb34-5e96-bbcf-616630f1a3da".to_string())
        );
    }

    #[test]
    fn size_check_reports_short_key() {
        let kp = KeyPair::new(vec![1; 16], vec![2; 8]);
        let reason = kp.check_sizes().expect("short key is reported");
        assert!(reason.contains("got 8"));
        assert!(pair(1, 2).check_sizes().is_none());
    }
}
