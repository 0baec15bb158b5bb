use rspackager_crypto::attributes::EncryptedStreamAttributes;
use rspackager_crypto::crypter::Encryptor;
use rspackager_crypto::key::{KeyMap, KeyPair, StreamLabel};
use rspackager_crypto::params::{EncryptionParams, EncryptionProvider, RawKeyEncryptionParams};
use rspackager_crypto::scheme::ProtectionScheme;

fn main() -> anyhow::Result<()> {
    let key_map = KeyMap::new()
        .with(
            "",
            KeyPair::from_hex(
                "eb676abbcb345e96bbcf616630f1a3da",
                "100b6c20940f779a4589152b57d2dacb",
            )?,
        )
        .with(
            "HD",
            KeyPair::from_hex(
                "63cb5f7184dd4b689a5c5ff11ee6a328",
                "3bda3329158a4789880816a70e7e436d",
            )?,
        );

    let mut params = EncryptionParams::new(EncryptionProvider::RawKey(
        RawKeyEncryptionParams::new(key_map),
    ))
    .with_stream_label_func(|attrs: &EncryptedStreamAttributes| match attrs {
        EncryptedStreamAttributes::Video(video) if video.height >= 720 => StreamLabel::new("HD"),
        _ => StreamLabel::default(),
    });
    params.protection_scheme = ProtectionScheme::CBCS;

    let encryptor = Encryptor::new(params)?;
    for attrs in [
        EncryptedStreamAttributes::video(1920, 1080, 30.0, 8),
        EncryptedStreamAttributes::video(640, 360, 30.0, 8),
        EncryptedStreamAttributes::audio(2),
    ] {
        let label = encryptor.stream_label(&attrs);
        let pair = encryptor.key_for_stream(&attrs)?;
        println!(
            "{} stream -> label {:?} -> kid {}",
            attrs.stream_type(),
            label.as_str(),
            pair.key_id_uuid()
                .map(|kid| kid.to_string())
                .unwrap_or_else(|| hex::encode(&pair.key_id))
        );
    }

    Ok(())
}
