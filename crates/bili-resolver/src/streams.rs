//! Stream-format retrieval and normalization.
//!
//! The playurl API answers in one of two mutually exclusive shapes: a
//! `dash` block with separate audio/video tracks, or a `durl` list of
//! progressive segments at a single quality. The raw response is decoded
//! once, classified into a tagged shape, and normalized into
//! [`ResolvedStreams`] so downstream code never probes for fields.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use bili_models::{
    estimate_size, quality_name, AudioVariant, BvId, ResolvedStreams, StreamFormat, VideoVariant,
};

use crate::client::BiliClient;
use crate::error::{ResolveError, ResolveResult};

/// `fnval` bitmask requesting the richest available response shape.
const FNVAL_ALL_FORMATS: u32 = 4048;

#[derive(Debug, Deserialize)]
struct RawPlayInfo {
    #[serde(default)]
    quality: u32,
    /// Total duration in milliseconds
    #[serde(default)]
    timelength: u64,
    #[serde(default)]
    accept_quality: Vec<u32>,
    #[serde(default)]
    support_formats: Vec<Value>,
    dash: Option<RawDash>,
    durl: Option<Vec<RawSegment>>,
}

#[derive(Debug, Deserialize)]
struct RawDash {
    video: Option<Vec<RawTrack>>,
    audio: Option<Vec<RawTrack>>,
    flac: Option<Value>,
    dolby: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    id: u32,
    // The upstream duplicates these under snake_case names as well; the
    // camelCase spelling is the documented one, the duplicates are ignored.
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "backupUrl", default)]
    backup_url: Option<Vec<String>>,
    #[serde(default)]
    bandwidth: u64,
    codecs: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    #[serde(rename = "frameRate")]
    frame_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    url: String,
    #[serde(default)]
    backup_url: Option<Vec<String>>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    length: u64,
}

/// Shape of a playurl response, decided once during parsing.
enum PlayShape {
    Segmented(RawDash),
    Combined(Vec<RawSegment>),
}

/// Fetch and normalize the stream set for one item.
pub async fn resolve(
    client: &BiliClient,
    bvid: &BvId,
    cid: u64,
    qn: u32,
) -> ResolveResult<ResolvedStreams> {
    debug!(bvid = %bvid, cid = cid, qn = qn, "fetching stream info");
    let raw: RawPlayInfo = client
        .get_data(&format!(
            "/x/player/playurl?bvid={bvid}&cid={cid}&qn={qn}&fnval={FNVAL_ALL_FORMATS}&fourk=1"
        ))
        .await?;
    normalize(raw)
}

fn normalize(raw: RawPlayInfo) -> ResolveResult<ResolvedStreams> {
    let shape = match (raw.dash, raw.durl) {
        (Some(dash), _) => PlayShape::Segmented(dash),
        (None, Some(segments)) => PlayShape::Combined(segments),
        (None, None) => {
            return Err(ResolveError::fetch("unrecognized playurl response shape"))
        }
    };

    let streams = match shape {
        PlayShape::Segmented(dash) => normalize_segmented(
            dash,
            raw.timelength,
            raw.accept_quality,
            raw.support_formats,
        ),
        PlayShape::Combined(segments) => normalize_combined(
            segments,
            raw.quality,
            raw.accept_quality,
            raw.support_formats,
        ),
    };

    if streams.videos.is_empty() && streams.audios.is_empty() {
        return Err(ResolveError::NoStream);
    }
    Ok(streams)
}

fn normalize_segmented(
    dash: RawDash,
    timelength_ms: u64,
    accept_quality: Vec<u32>,
    support_formats: Vec<Value>,
) -> ResolvedStreams {
    let mut videos: Vec<VideoVariant> = dash
        .video
        .unwrap_or_default()
        .into_iter()
        .map(|track| VideoVariant {
            quality: quality_name(track.id).to_string(),
            quality_id: track.id,
            url: track.base_url,
            backup_url: track.backup_url.unwrap_or_default(),
            size: estimate_size(track.bandwidth, timelength_ms),
            bandwidth: Some(track.bandwidth),
            codecs: track.codecs,
            width: track.width,
            height: track.height,
            frame_rate: track.frame_rate,
            size_bytes: None,
            duration_ms: None,
        })
        .collect();
    videos.sort_by(|a, b| b.quality_id.cmp(&a.quality_id));

    let mut audios: Vec<AudioVariant> = dash
        .audio
        .unwrap_or_default()
        .into_iter()
        .map(|track| AudioVariant {
            url: track.base_url,
            backup_url: track.backup_url.unwrap_or_default(),
            size: estimate_size(track.bandwidth, timelength_ms),
            bandwidth: track.bandwidth,
            codecs: track.codecs,
        })
        .collect();
    audios.sort_by(|a, b| b.bandwidth.cmp(&a.bandwidth));

    ResolvedStreams {
        format: StreamFormat::Segmented,
        videos,
        audios,
        flac: dash.flac,
        dolby: dash.dolby,
        accept_quality,
        support_formats,
    }
}

fn normalize_combined(
    segments: Vec<RawSegment>,
    quality: u32,
    accept_quality: Vec<u32>,
    support_formats: Vec<Value>,
) -> ResolvedStreams {
    // One fixed quality applies to every listed segment; sizes are the
    // upstream's own byte counts, not estimates.
    let videos: Vec<VideoVariant> = segments
        .into_iter()
        .map(|segment| VideoVariant {
            quality: quality_name(quality).to_string(),
            quality_id: quality,
            url: segment.url,
            backup_url: segment.backup_url.unwrap_or_default(),
            bandwidth: None,
            codecs: None,
            width: None,
            height: None,
            frame_rate: None,
            size: None,
            size_bytes: Some(segment.size),
            duration_ms: Some(segment.length),
        })
        .collect();

    ResolvedStreams {
        format: StreamFormat::Combined,
        videos,
        audios: Vec::new(),
        flac: None,
        dolby: None,
        accept_quality,
        support_formats,
    }
}
