//! Quality-tier selection.

use bili_models::{ResolvedStreams, StreamFormat, StreamSelection};

/// Choose the best-matching variants for a requested quality code.
///
/// An exact rank match wins; otherwise the first entry of the
/// already-descending video list (the highest available quality) is the
/// fallback. Audio selection exists only for the segmented format and is
/// always the highest-bandwidth variant, independent of the request.
pub fn select_streams(streams: &ResolvedStreams, requested: u32) -> StreamSelection {
    let exact = streams
        .videos
        .iter()
        .find(|v| v.quality_id == requested)
        .cloned();
    let is_exact = exact.is_some();
    let video = exact.or_else(|| streams.videos.first().cloned());

    let audio = match streams.format {
        StreamFormat::Segmented => streams.audios.first().cloned(),
        StreamFormat::Combined => None,
    };

    StreamSelection {
        video,
        audio,
        exact: is_exact,
    }
}
