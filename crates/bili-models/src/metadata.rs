//! Per-item descriptive metadata.

use serde::{Deserialize, Serialize};

use crate::ids::BvId;

/// Descriptive metadata for one video, produced once per resolved item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Canonical identifier
    pub bvid: BvId,
    /// Title
    pub title: String,
    /// Description
    pub desc: String,
    /// Cover image URL
    pub pic: String,
    /// Internal content id, required for the stream lookup
    pub cid: u64,
    /// Duration in seconds
    pub duration: u64,
    /// Owner display name
    pub owner: String,
    /// Engagement counters
    pub stats: ItemStats,
}

/// View / comment / like counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    pub view: u64,
    pub danmaku: u64,
    pub like: u64,
}
