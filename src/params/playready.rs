use crate::error::ConfigError;
use crate::key::KeyPair;

/// PlayReady encryption parameters.
///
/// Keys are acquired in one of two modes:
///
/// 1. Fetched from a key server: `key_server_url` and `program_identifier` are
///    required, the certificate fields depend on the server setup.
/// 2. Supplied directly: both `key_id` and `key` are required.
///
/// Populating fields of both modes is an error.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PlayreadyEncryptionParams {
    /// PlayReady license / key server URL.
    pub key_server_url: String,
    /// PlayReady program identifier.
    pub program_identifier: String,
    /// Path to the CA file for the server certificate, PEM format.
    pub ca_file: String,
    /// Path to the client certificate file.
    pub client_cert_file: String,
    /// Path to the client certificate private key file.
    pub client_cert_private_key_file: String,
    /// Password of the private key file.
    pub client_cert_private_key_password: String,
    /// Raw PlayReady key id.
    pub key_id: Vec<u8>,
    /// Raw PlayReady key.
    pub key: Vec<u8>,
}

/// Acquisition mode of validated PlayReady parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayreadyKeySource<'a> {
    /// Fetch keys from a PlayReady key server.
    Server {
        key_server_url: &'a str,
        program_identifier: &'a str,
    },
    /// Use the raw key id and key.
    Raw { key_id: &'a [u8], key: &'a [u8] },
}

impl PlayreadyEncryptionParams {
    /// Parameters fetching keys from a key server.
    pub fn server(
        key_server_url: impl Into<String>,
        program_identifier: impl Into<String>,
    ) -> Self {
        Self {
            key_server_url: key_server_url.into(),
            program_identifier: program_identifier.into(),
            ..Default::default()
        }
    }

    /// Parameters carrying a raw key.
    pub fn raw(key_id: Vec<u8>, key: Vec<u8>) -> Self {
        Self {
            key_id,
            key,
            ..Default::default()
        }
    }

    fn has_server_fields(&self) -> bool {
        [
            &self.key_server_url,
            &self.program_identifier,
            &self.ca_file,
            &self.client_cert_file,
            &self.client_cert_private_key_file,
            &self.client_cert_private_key_password,
        ]
        .iter()
        .any(|f| !f.is_empty())
    }

    fn has_raw_fields(&self) -> bool {
        !self.key_id.is_empty() || !self.key.is_empty()
    }

    /// Classify the parameters into exactly one acquisition mode.
    pub fn key_source(&self) -> Result<PlayreadyKeySource<'_>, ConfigError> {
        match (self.has_server_fields(), self.has_raw_fields()) {
            (true, true) => Err(ConfigError::AmbiguousMode),
            (true, false) => {
                let missing: Vec<&str> = [
                    ("key_server_url", &self.key_server_url),
                    ("program_identifier", &self.program_identifier),
                ]
                .into_iter()
                .filter(|(_, v)| v.is_empty())
                .map(|(name, _)| name)
                .collect();
                if !missing.is_empty() {
                    return Err(ConfigError::IncompleteMode {
                        reason: format!("key server mode is missing {}", missing.join(", ")),
                    });
                }
                Ok(PlayreadyKeySource::Server {
                    key_server_url: &self.key_server_url,
                    program_identifier: &self.program_identifier,
                })
            }
            (false, true) => {
                if self.key_id.is_empty() || self.key.is_empty() {
                    let field = if self.key_id.is_empty() { "key_id" } else { "key" };
                    return Err(ConfigError::IncompleteMode {
                        reason: format!("raw key mode is missing {}", field),
                    });
                }
                Ok(PlayreadyKeySource::Raw {
                    key_id: &self.key_id,
                    key: &self.key,
                })
            }
            (false, false) => Err(ConfigError::IncompleteMode {
                reason: "set either key_server_url and program_identifier, or key_id and key"
                    .to_string(),
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.key_source().map(|_| ())
    }

    /// The raw key pair, when the parameters are in raw key mode.
    pub fn raw_key_pair(&self) -> Option<KeyPair> {
        match self.key_source() {
            Ok(PlayreadyKeySource::Raw { key_id, key }) => Some(KeyPair::new(key_id, key)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for PlayreadyEncryptionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayreadyEncryptionParams")
            .field("key_server_url", &self.key_server_url)
            .field("program_identifier", &self.program_identifier)
            .field("ca_file", &self.ca_file)
            .field("client_cert_file", &self.client_cert_file)
            .field("client_cert_private_key_file", &self.client_cert_private_key_file)
            .field(
                "client_cert_private_key_password",
                &(!self.client_cert_private_key_password.is_empty()).then_some("<redacted>"),
            )
            .field("key_id", &hex::encode(&self.key_id))
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .finish()
    }
}
