//! Thin HTTP front end over the resolution pipeline.
//!
//! Maps query parameters onto pipeline calls and serializes results into
//! the `{code, message, data}` envelope. All engineering content lives in
//! `bili-resolver`; this crate is I/O glue.

use std::sync::Arc;

use bili_resolver::{Resolver, ResolverConfig};

pub mod config;
pub mod handlers;
pub mod routes;

pub use config::ApiConfig;
pub use routes::create_router;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    /// Credential-free resolver shared across requests; requests carrying
    /// a cookie get their own scoped instance.
    pub resolver: Arc<Resolver>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let resolver = Resolver::new(ResolverConfig::default())?;
        Ok(Self {
            config,
            resolver: Arc::new(resolver),
        })
    }
}
