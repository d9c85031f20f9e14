//! Normalized stream variants, resolved stream sets and selection results.
//!
//! The upstream playurl API answers in one of two mutually exclusive
//! shapes. Both are normalized into [`ResolvedStreams`] tagged with a
//! [`StreamFormat`], so every consumer matches exhaustively on the format
//! instead of probing for fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delivery format of a resolved stream set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamFormat {
    /// Audio and video are separate tracks; the client muxes them.
    Segmented,
    /// One progressive file per quality carries both audio and video.
    Combined,
}

impl std::fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamFormat::Segmented => write!(f, "segmented"),
            StreamFormat::Combined => write!(f, "combined"),
        }
    }
}

/// A single video stream variant.
///
/// Segmented variants carry bandwidth, codec and geometry plus an estimated
/// size; combined variants carry the exact reported byte size and their own
/// playable duration instead. Absent fields are skipped on serialization so
/// each shape serializes faithfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoVariant {
    /// Tier display name (`"1080P"`, `"unknown"`, ...)
    pub quality: String,
    /// Numeric quality rank
    pub quality_id: u32,
    /// Primary URL
    pub url: String,
    /// Backup URLs
    pub backup_url: Vec<String>,
    /// Bandwidth in bits per second (segmented only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,
    /// Codec string (segmented only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codecs: Option<String>,
    /// Pixel width (segmented only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height (segmented only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Frame rate as reported upstream (segmented only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,
    /// Human-formatted estimated size (segmented only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Exact reported size in bytes (combined only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Playable duration of this segment in milliseconds (combined only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// A single audio stream variant (segmented format only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioVariant {
    /// Primary URL
    pub url: String,
    /// Backup URLs
    pub backup_url: Vec<String>,
    /// Bandwidth in bits per second
    pub bandwidth: u64,
    /// Codec string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codecs: Option<String>,
    /// Human-formatted estimated size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// The full normalized answer of the stream resolver for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStreams {
    /// Delivery format tag
    pub format: StreamFormat,
    /// Video variants, descending by quality rank
    pub videos: Vec<VideoVariant>,
    /// Audio variants, descending by bandwidth; empty for combined format
    pub audios: Vec<AudioVariant>,
    /// Lossless audio block, passed through verbatim when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flac: Option<Value>,
    /// Spatial audio block, passed through verbatim when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dolby: Option<Value>,
    /// Quality tiers the account is entitled to
    pub accept_quality: Vec<u32>,
    /// Supported container formats, passed through verbatim
    pub support_formats: Vec<Value>,
}

/// Result of selecting variants for a requested quality.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSelection {
    /// The chosen video variant, if any
    pub video: Option<VideoVariant>,
    /// The chosen audio variant (segmented format only)
    pub audio: Option<AudioVariant>,
    /// Whether the requested tier was matched exactly; `false` means the
    /// highest available variant was used as fallback
    pub exact: bool,
}

/// One row of the available-quality listing in an assembled result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityOption {
    /// Tier display name
    pub quality: String,
    /// Numeric quality rank
    pub quality_id: u32,
    /// `"{width}x{height}"`
    pub resolution: String,
    /// Frame rate as reported upstream
    pub fps: String,
    /// Codec string
    pub codecs: String,
}
