//! Stream attribute snapshots and stream label resolution.
//!
//! Each stream to be encrypted is summarized as an [`EncryptedStreamAttributes`]
//! value. A [`StreamLabelFn`] turns that snapshot into a [`StreamLabel`], which
//! then selects a key pair from the active key map.

use std::fmt;

use crate::key::StreamLabel;

/// Kind of stream described by [`EncryptedStreamAttributes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptedStreamType {
    #[default]
    Unknown,
    Video,
    Audio,
}

/// Video geometry of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoAttributes {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f32,
    pub bit_depth: u32,
}

/// Audio layout of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioAttributes {
    pub number_of_channels: u32,
}

/// Snapshot of an encrypted stream used to pick its stream label.
///
/// The payload always matches the stream type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EncryptedStreamAttributes {
    #[default]
    Unknown,
    Video(VideoAttributes),
    Audio(AudioAttributes),
}

impl EncryptedStreamAttributes {
    pub fn video(width: u32, height: u32, frame_rate: f32, bit_depth: u32) -> Self {
        Self::Video(VideoAttributes {
            width,
            height,
            frame_rate,
            bit_depth,
        })
    }

    pub fn audio(number_of_channels: u32) -> Self {
        Self::Audio(AudioAttributes { number_of_channels })
    }

    pub fn stream_type(&self) -> EncryptedStreamType {
        match self {
            Self::Unknown => EncryptedStreamType::Unknown,
            Self::Video(_) => EncryptedStreamType::Video,
            Self::Audio(_) => EncryptedStreamType::Audio,
        }
    }
}

/// Assigns a stream label to a stream about to be encrypted.
///
/// Implementations must be pure functions of the attributes: they may be
/// called concurrently from several stream workers, and must return the same
/// label for the same attributes for the whole job, since a label always maps
/// to the same key pair.
///
/// Any `Fn(&EncryptedStreamAttributes) -> StreamLabel + Send + Sync` closure
/// implements this trait.
pub trait StreamLabelFn: Send + Sync {
    fn stream_label(&self, attributes: &EncryptedStreamAttributes) -> StreamLabel;
}

impl<F> StreamLabelFn for F
where
    F: Fn(&EncryptedStreamAttributes) -> StreamLabel + Send + Sync,
{
    fn stream_label(&self, attributes: &EncryptedStreamAttributes) -> StreamLabel {
        self(attributes)
    }
}

/// Label function used when the caller supplies none: every stream gets the
/// default (empty) label and therefore the default key pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStreamLabel;

impl StreamLabelFn for DefaultStreamLabel {
    fn stream_label(&self, _attributes: &EncryptedStreamAttributes) -> StreamLabel {
        StreamLabel::default()
    }
}

/// Resolve the stream label for `attributes`.
///
/// The custom function's result is used verbatim when present.
pub fn resolve_label(
    attributes: &EncryptedStreamAttributes,
    custom: Option<&dyn StreamLabelFn>,
) -> StreamLabel {
    let label = match custom {
        Some(func) => func.stream_label(attributes),
        None => DefaultStreamLabel.stream_label(attributes),
    };
    debug!(
        "Resolved stream label {:?} for {:?} stream",
        label,
        attributes.stream_type()
    );
    label
}

impl fmt::Display for EncryptedStreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Video => "video",
            Self::Audio => "audio",
        })
    }
}
