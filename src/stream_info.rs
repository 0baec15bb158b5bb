//! Basic elementary stream metadata.
//!
//! [`StreamInfo`] is produced by the demuxing stage and read by everything
//! downstream. Its `Display` output is a diagnostic summary for logs; nothing
//! parses it.
use std::fmt;

use crate::attributes::EncryptedStreamAttributes;

/// Type of an elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamType {
    #[default]
    Unknown,
    Audio,
    Video,
    Text,
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamType::Unknown => "Unknown",
            StreamType::Audio => "Audio",
            StreamType::Video => "Video",
            StreamType::Text => "Text",
        })
    }
}

/// Codec of an elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    #[default]
    Unknown,
    H264,
    H265,
    Vp8,
    Vp9,
    Av1,
    Aac,
    Ac3,
    Eac3,
    Opus,
    Vorbis,
    Flac,
    WebVtt,
    Ttml,
}

impl Codec {
    pub fn stream_type(self) -> StreamType {
        match self {
            Codec::Unknown => StreamType::Unknown,
            Codec::H264 | Codec::H265 | Codec::Vp8 | Codec::Vp9 | Codec::Av1 => StreamType::Video,
            Codec::Aac | Codec::Ac3 | Codec::Eac3 | Codec::Opus | Codec::Vorbis | Codec::Flac => {
                StreamType::Audio
            }
            Codec::WebVtt | Codec::Ttml => StreamType::Text,
        }
    }
}

/// Video specific stream details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoStreamInfo {
    pub width: u32,
    pub height: u32,
    /// Duration of one frame in time scale units.
    pub frame_duration: u32,
    pub bit_depth: u32,
}

/// Audio specific stream details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioStreamInfo {
    pub num_channels: u32,
    pub sample_bits: u32,
    pub sampling_frequency: u32,
}

/// Type specific stream details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamDetails {
    #[default]
    Unknown,
    Audio(AudioStreamInfo),
    Video(VideoStreamInfo),
    Text,
}

impl StreamDetails {
    pub fn stream_type(&self) -> StreamType {
        match self {
            StreamDetails::Unknown => StreamType::Unknown,
            StreamDetails::Audio(_) => StreamType::Audio,
            StreamDetails::Video(_) => StreamType::Video,
            StreamDetails::Text => StreamType::Text,
        }
    }
}

/// Metadata of an elementary stream. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    details: StreamDetails,
    track_id: u32,
    time_scale: u32,
    duration: u64,
    codec: Codec,
    codec_string: String,
    codec_config: Vec<u8>,
    language: String,
    is_encrypted: bool,
}

impl StreamInfo {
    /// Create a new StreamInfo. The stream type follows from `details`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        details: StreamDetails,
        track_id: u32,
        time_scale: u32,
        duration: u64,
        codec: Codec,
        codec_string: impl Into<String>,
        codec_config: &[u8],
        language: impl Into<String>,
        is_encrypted: bool,
    ) -> Self {
        Self {
            details,
            track_id,
            time_scale,
            duration,
            codec,
            codec_string: codec_string.into(),
            codec_config: codec_config.to_vec(),
            language: language.into(),
            is_encrypted,
        }
    }

    pub fn stream_type(&self) -> StreamType {
        self.details.stream_type()
    }

    pub fn details(&self) -> &StreamDetails {
        &self.details
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    /// Duration in time scale units.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Duration in seconds, 0 when the time scale is unknown.
    pub fn duration_seconds(&self) -> f64 {
        if self.time_scale == 0 {
            return 0.0;
        }
        self.duration as f64 / self.time_scale as f64
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn codec_string(&self) -> &str {
        &self.codec_string
    }

    pub fn codec_config(&self) -> &[u8] {
        &self.codec_config
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_encrypted(&self) -> bool {
        self.is_encrypted
    }

    /// Snapshot used to pick the stream label of this stream.
    pub fn encrypted_stream_attributes(&self) -> EncryptedStreamAttributes {
        match self.details {
            StreamDetails::Video(video) => {
                let frame_rate = if video.frame_duration == 0 {
                    0.0
                } else {
                    self.time_scale as f32 / video.frame_duration as f32
                };
                EncryptedStreamAttributes::video(
                    video.width,
                    video.height,
                    frame_rate,
                    video.bit_depth,
                )
            }
            StreamDetails::Audio(audio) => EncryptedStreamAttributes::audio(audio.num_channels),
            StreamDetails::Unknown | StreamDetails::Text => EncryptedStreamAttributes::Unknown,
        }
    }
}

impl From<&StreamInfo> for EncryptedStreamAttributes {
    fn from(info: &StreamInfo) -> Self {
        info.encrypted_stream_attributes()
    }
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type: {}\n codec_string: {}\n time_scale: {}\n duration: {} ({:.1} seconds)\n is_encrypted: {}\n",
            self.stream_type(),
            self.codec_string,
            self.time_scale,
            self.duration,
            self.duration_seconds(),
            self.is_encrypted
        )
    }
}
