use rspackager_crypto::config::EncryptionConfig;
use rspackager_crypto::params::EncryptionProvider;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .expect("Usage: config_inspect <encryption.yaml>");

    let params = EncryptionConfig::from_path(&path)?.into_params()?;
    println!("key_provider: {}", params.key_provider());
    println!("protection_scheme: {}", params.protection_scheme);
    println!("key_rotation: {}", params.key_rotation_enabled());

    if let EncryptionProvider::RawKey(raw) = &params.provider {
        for (label, pair) in &raw.key_map {
            println!("label {:?}: kid {}", label.as_str(), hex::encode(&pair.key_id));
        }
    }

    Ok(())
}
