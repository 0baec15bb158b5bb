#![cfg(feature = "cli")]
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand};

use rspackager_crypto::attributes::EncryptedStreamAttributes;
use rspackager_crypto::config::{DecryptionConfig, EncryptionConfig};
use rspackager_crypto::crypter::{Decryptor, Encryptor};
use rspackager_crypto::key::KeyPair;
use rspackager_crypto::params::{
    DecryptionProvider, EncryptionParams, EncryptionProvider, KeyProvider, PlayreadyKeySource,
};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "rspackager-crypto", version, about = "rspackager-crypto CLI")]
struct Cli {
    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Load a job configuration and validate its parameters.
    Validate {
        config_path: PathBuf,
        /// Treat the file as a decryption configuration.
        #[arg(long = "decryption", action = ArgAction::SetTrue)]
        decryption: bool,
    },
    /// Resolve the stream label and key pair of a stream.
    ///
    /// Keys are only available for providers that carry them in the
    /// configuration (raw key, PlayReady raw key mode).
    Resolve {
        config_path: PathBuf,
        #[command(flatten)]
        stream: StreamArgs,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct StreamArgs {
    /// Video stream geometry, e.g. 1920x1080.
    #[arg(long = "video", value_parser = parse_geometry)]
    video: Option<(u32, u32)>,
    /// Audio stream channel count.
    #[arg(long = "audio")]
    audio: Option<u32>,
}

impl StreamArgs {
    fn attributes(&self) -> EncryptedStreamAttributes {
        match (self.video, self.audio) {
            (Some((width, height)), _) => EncryptedStreamAttributes::video(width, height, 0.0, 8),
            (None, Some(channels)) => EncryptedStreamAttributes::audio(channels),
            (None, None) => EncryptedStreamAttributes::Unknown,
        }
    }
}

fn parse_geometry(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", value))?;
    let width = width.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let height = height.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    Ok((width, height))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(level).init();

    info!("rspackager-crypto version {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Validate {
            config_path,
            decryption,
        } => {
            if decryption {
                run_validate_decryption(&config_path)
            } else {
                run_validate_encryption(&config_path)
            }
        }
        Commands::Resolve {
            config_path,
            stream,
        } => run_resolve(&config_path, &stream.attributes()),
    }
}

fn load_encryption(path: &Path) -> anyhow::Result<EncryptionParams> {
    let config = EncryptionConfig::from_path(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(config.into_params()?)
}

fn run_validate_encryption(path: &Path) -> anyhow::Result<()> {
    let params = load_encryption(path)?;
    info!("[+] Encryption parameters are valid");
    info!(" key_provider: {}", params.key_provider());
    info!(" protection_scheme: {}", params.protection_scheme);
    info!(" clear_lead_in_seconds: {}", params.clear_lead_in_seconds);
    if params.key_rotation_enabled() {
        info!(
            " crypto_period_duration_in_seconds: {}",
            params.crypto_period_duration_in_seconds
        );
    } else {
        info!(" key rotation: off");
    }
    info!(" vp9_subsample_encryption: {}", params.vp9_subsample_encryption);

    match &params.provider {
        EncryptionProvider::None => warn!("[!] No key provider: streams will not be encrypted"),
        EncryptionProvider::Widevine(wv) => {
            info!(" key_server_url: {}", wv.key_server_url);
            info!(" signer: {} ({})", wv.signer.signer_name, wv.signer.signing_key_type());
        }
        EncryptionProvider::Playready(pr) => match pr.key_source()? {
            PlayreadyKeySource::Server { key_server_url, .. } => {
                info!(" key_server_url: {}", key_server_url)
            }
            PlayreadyKeySource::Raw { key_id, .. } => {
                info!(" key_id: {}", hex::encode(key_id))
            }
        },
        EncryptionProvider::RawKey(raw) => {
            for (label, pair) in &raw.key_map {
                info!(" [{}] {}", display_label(label.as_str()), display_key_id(pair));
            }
        }
    }
    Ok(())
}

fn run_validate_decryption(path: &Path) -> anyhow::Result<()> {
    let config = DecryptionConfig::from_path(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let params = config.into_params()?;
    info!("[+] Decryption parameters are valid");
    info!(" key_provider: {}", params.key_provider());
    match &params.provider {
        DecryptionProvider::None => warn!("[!] No key provider: streams will not be decrypted"),
        DecryptionProvider::Widevine(wv) => info!(" key_server_url: {}", wv.key_server_url),
        DecryptionProvider::RawKey(raw) => {
            for (label, pair) in &raw.key_map {
                info!(" [{}] {}", display_label(label.as_str()), display_key_id(pair));
            }
        }
    }

    if params.key_provider() != KeyProvider::None {
        let decryptor = Decryptor::new(params).context("Failed to create decryptor")?;
        let keys = if decryptor.keys_loaded() {
            "loaded"
        } else {
            "pending (key server)"
        };
        info!(" keys: {}", keys);
    }
    Ok(())
}

fn run_resolve(path: &Path, attributes: &EncryptedStreamAttributes) -> anyhow::Result<()> {
    let params = load_encryption(path)?;
    let encryptor = Encryptor::new(params).context("Failed to create encryptor")?;

    let label = encryptor.stream_label(attributes);
    info!("[+] Stream label: {}", display_label(label.as_str()));

    if !encryptor.keys_loaded() {
        bail!(
            "{} keys come from the key server and cannot be resolved offline",
            encryptor.key_provider()
        );
    }
    let pair = encryptor.key_for_stream(attributes)?;
    info!("[+] Key ID: {}", display_key_id(pair));
    Ok(())
}

fn display_label(label: &str) -> &str {
    if label.is_empty() {
        "<default>"
    } else {
        label
    }
}

fn display_key_id(pair: &KeyPair) -> String {
    match pair.key_id_uuid() {
        Some(uuid) => uuid.to_string(),
        None => hex::encode(&pair.key_id),
    }
}
