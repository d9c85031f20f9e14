//! Resolution pipeline for Bilibili video identifiers.
//!
//! Turns raw user input (ids, links, short links, legacy numeric ids) into
//! downloadable stream descriptors, for single items or keyed batches:
//!
//! 1. identifier normalization ([`Resolver::normalize`])
//! 2. concurrent metadata fetch ([`metadata`])
//! 3. stream-format normalization across both upstream shapes ([`streams`])
//! 4. quality selection and result assembly ([`select`], [`assemble`])
//!
//! Failures are item-scoped throughout: one bad input never aborts its
//! batch siblings, and every input key reappears in the output exactly once.

pub mod assemble;
pub mod client;
pub mod error;
pub mod metadata;
pub mod resolver;
pub mod select;
pub mod streams;

pub use assemble::{assemble, DownloadInfo, ResolvedItem};
pub use client::{BiliClient, ClientConfig};
pub use error::{ResolveError, ResolveResult};
pub use resolver::{ItemOutcome, Resolver, ResolverConfig};
pub use select::select_streams;
