//! Resolver error types.
//!
//! All three kinds are item-scoped: inside a batch they mark a single key
//! as failed and never abort sibling items.

use thiserror::Error;

pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No canonical identifier could be derived from the input.
    #[error("invalid video id or link: {0}")]
    Identifier(String),

    /// Transport failure, non-success upstream status, or a malformed
    /// response body.
    #[error("{0}")]
    Fetch(String),

    /// A recognized stream response carried no usable variants at all.
    #[error("no usable stream found")]
    NoStream,
}

impl ResolveError {
    pub fn identifier(input: impl Into<String>) -> Self {
        Self::Identifier(input.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Short, stable reason string for per-item error payloads.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
