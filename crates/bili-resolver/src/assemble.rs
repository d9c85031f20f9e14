//! Final per-item result assembly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use bili_models::{
    AudioVariant, BvId, ItemMetadata, ItemStats, QualityOption, ResolvedStreams, StreamFormat,
    StreamSelection, VideoVariant,
};

/// Client-side command hint for muxing segmented downloads.
const MERGE_COMMAND: &str = "ffmpeg -i video.mp4 -i audio.mp4 -c copy output.mp4";

/// The assembled, serializable result for one successfully resolved item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub bvid: BvId,
    pub title: String,
    pub owner: String,
    pub pic: String,
    /// Duration in seconds
    pub duration: u64,
    pub desc: String,
    pub stats: ItemStats,
    /// Delivery format of the resolved streams
    pub format: StreamFormat,
    pub download: DownloadInfo,
    /// Human-readable status annotation
    pub tips: String,
}

/// Download descriptors for the chosen variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadInfo {
    /// The chosen video variant
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub video: Option<VideoVariant>,
    /// The chosen audio variant (segmented format only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub audio: Option<AudioVariant>,
    /// Every available video quality (segmented format only)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub available_quality: Vec<QualityOption>,
    /// Lossless audio passthrough
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flac: Option<Value>,
    /// Spatial audio passthrough
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dolby: Option<Value>,
    /// Mux hint for segmented downloads
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub merge_command: Option<String>,
}

/// Compose metadata, resolved streams and the selection into the final
/// per-item structure.
pub fn assemble(
    metadata: ItemMetadata,
    streams: ResolvedStreams,
    selection: StreamSelection,
) -> ResolvedItem {
    let tips = annotation(&selection);

    let download = match streams.format {
        StreamFormat::Segmented => DownloadInfo {
            video: selection.video,
            audio: selection.audio,
            available_quality: streams.videos.iter().map(quality_option).collect(),
            flac: streams.flac,
            dolby: streams.dolby,
            merge_command: Some(MERGE_COMMAND.to_string()),
        },
        StreamFormat::Combined => DownloadInfo {
            video: selection.video,
            audio: None,
            available_quality: Vec::new(),
            flac: None,
            dolby: None,
            merge_command: None,
        },
    };

    ResolvedItem {
        bvid: metadata.bvid,
        title: metadata.title,
        owner: metadata.owner,
        pic: metadata.pic,
        duration: metadata.duration,
        desc: metadata.desc,
        stats: metadata.stats,
        format: streams.format,
        download,
        tips,
    }
}

fn quality_option(variant: &VideoVariant) -> QualityOption {
    QualityOption {
        quality: variant.quality.clone(),
        quality_id: variant.quality_id,
        resolution: format!(
            "{}x{}",
            variant.width.unwrap_or(0),
            variant.height.unwrap_or(0)
        ),
        fps: variant.frame_rate.clone().unwrap_or_default(),
        codecs: variant.codecs.clone().unwrap_or_default(),
    }
}

/// Status annotation for a selection outcome.
fn annotation(selection: &StreamSelection) -> String {
    match (&selection.video, selection.exact) {
        (Some(video), true) => format!("obtained {}", video.quality),
        (Some(video), false) => format!(
            "target tier unavailable, obtained highest available: {}",
            video.quality
        ),
        (None, _) => "no usable stream found".to_string(),
    }
}
