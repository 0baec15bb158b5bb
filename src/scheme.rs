//! Protection scheme fourCCs.
use std::fmt;
use std::str::FromStr;

/// Block cipher mode / subsample variant applied during encryption,
/// identified by its fourCC.
///
/// Any fourCC can be represented so that configuration can carry it to
/// validation, which only accepts the four known schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtectionScheme(u32);

impl ProtectionScheme {
    /// AES-CTR full sample encryption ("cenc").
    pub const CENC: Self = Self(0x63656E63);
    /// AES-CBC full sample encryption ("cbc1").
    pub const CBC1: Self = Self(0x63626331);
    /// AES-CTR subsample pattern encryption ("cens").
    pub const CENS: Self = Self(0x63656E73);
    /// AES-CBC subsample pattern encryption ("cbcs").
    pub const CBCS: Self = Self(0x63626373);

    pub const KNOWN: [Self; 4] = [Self::CENC, Self::CBC1, Self::CENS, Self::CBCS];

    pub const fn from_fourcc(fourcc: u32) -> Self {
        Self(fourcc)
    }

    pub const fn fourcc(self) -> u32 {
        self.0
    }

    pub fn is_known(self) -> bool {
        Self::KNOWN.contains(&self)
    }

    /// Whether the scheme uses AES-CBC rather than AES-CTR.
    pub fn is_cbc(self) -> bool {
        self == Self::CBC1 || self == Self::CBCS
    }

    /// Whether the scheme encrypts with a crypt/skip block pattern.
    pub fn is_pattern(self) -> bool {
        self == Self::CENS || self == Self::CBCS
    }
}

impl Default for ProtectionScheme {
    fn default() -> Self {
        Self::CENC
    }
}

impl fmt::Display for ProtectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic()) {
            for b in bytes {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{:08x}", self.0)
        }
    }
}

/// Error parsing a protection scheme string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("protection scheme must be a four character code, got {0:?}")]
pub struct ParseSchemeError(pub String);

impl FromStr for ProtectionScheme {
    type Err = ParseSchemeError;

    /// Parse any four ASCII characters. Unknown codes parse successfully and
    /// are rejected later by validation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| ParseSchemeError(s.to_string()))?;
        if !bytes.iter().all(|b| b.is_ascii_graphic()) {
            return Err(ParseSchemeError(s.to_string()));
        }
        Ok(Self(u32::from_be_bytes(bytes)))
    }
}

#[cfg(feature = "config")]
impl<'de> serde::Deserialize<'de> for ProtectionScheme {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
