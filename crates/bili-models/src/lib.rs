//! Shared data models for the Bilibili stream resolver.
//!
//! This crate provides the pure, I/O-free building blocks:
//! - Canonical video identifiers and the legacy av-number codec
//! - Quality tiers and the code/name table
//! - Normalized stream variants and selection results
//! - Per-item metadata
//! - File size estimation and human-readable formatting

pub mod ids;
pub mod metadata;
pub mod quality;
pub mod size;
pub mod stream;

// Re-export common types
pub use ids::{scan_input, BvId, IdError, IdScan};
pub use metadata::{ItemMetadata, ItemStats};
pub use quality::{parse_quality_hint, quality_name, Quality, DEFAULT_QUALITY};
pub use size::{estimate_size, format_size};
pub use stream::{
    AudioVariant, QualityOption, ResolvedStreams, StreamFormat, StreamSelection, VideoVariant,
};
