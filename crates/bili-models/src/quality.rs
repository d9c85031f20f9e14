//! Quality tiers and the numeric code table.

use std::fmt;

/// Default quality code applied when a request carries no usable hint
/// (1080P).
pub const DEFAULT_QUALITY: u32 = 80;

/// The named quality tiers the upstream API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Q8K,
    Q4K,
    Q1080P60,
    Q1080P,
    Q720P60,
    Q720P,
    Q480P,
    Q360P,
}

impl Quality {
    /// All tiers, highest first.
    pub const ALL: [Quality; 8] = [
        Quality::Q8K,
        Quality::Q4K,
        Quality::Q1080P60,
        Quality::Q1080P,
        Quality::Q720P60,
        Quality::Q720P,
        Quality::Q480P,
        Quality::Q360P,
    ];

    /// The numeric code (`qn`) of this tier.
    pub fn code(self) -> u32 {
        match self {
            Quality::Q8K => 127,
            Quality::Q4K => 120,
            Quality::Q1080P60 => 116,
            Quality::Q1080P => 80,
            Quality::Q720P60 => 74,
            Quality::Q720P => 64,
            Quality::Q480P => 32,
            Quality::Q360P => 16,
        }
    }

    /// The display name of this tier.
    pub fn name(self) -> &'static str {
        match self {
            Quality::Q8K => "8K",
            Quality::Q4K => "4K",
            Quality::Q1080P60 => "1080P60",
            Quality::Q1080P => "1080P",
            Quality::Q720P60 => "720P60",
            Quality::Q720P => "720P",
            Quality::Q480P => "480P",
            Quality::Q360P => "360P",
        }
    }

    /// Look a tier up by numeric code.
    pub fn from_code(code: u32) -> Option<Quality> {
        Quality::ALL.iter().copied().find(|q| q.code() == code)
    }

    /// Look a tier up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Quality> {
        let name = name.trim();
        Quality::ALL
            .iter()
            .copied()
            .find(|q| q.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name for an arbitrary quality code; codes outside the table map
/// to `"unknown"`.
pub fn quality_name(code: u32) -> &'static str {
    Quality::from_code(code).map(Quality::name).unwrap_or("unknown")
}

/// Parse a caller-supplied quality hint.
///
/// A numeric hint is passed through verbatim (the upstream accepts codes we
/// do not know by name); a tier name is resolved through the table. Returns
/// `None` for anything else so callers apply [`DEFAULT_QUALITY`] explicitly.
pub fn parse_quality_hint(hint: &str) -> Option<u32> {
    let hint = hint.trim();
    if let Ok(code) = hint.parse::<u32>() {
        return Some(code);
    }
    Quality::from_name(hint).map(Quality::code)
}
