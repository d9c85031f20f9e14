//! Batch orchestration over the resolution pipeline.
//!
//! Four stages, each a fan-out of independent requests joined at a barrier:
//! normalize, metadata, streams, then select + assemble. A key that fails a
//! stage becomes an error result immediately and is excluded from later
//! stages; every input key appears in the output exactly once.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, info, warn};

use bili_models::{parse_quality_hint, scan_input, BvId, IdScan, ItemMetadata, DEFAULT_QUALITY};

use crate::assemble::{assemble, ResolvedItem};
use crate::client::{BiliClient, ClientConfig};
use crate::error::{ResolveError, ResolveResult};
use crate::select::select_streams;
use crate::{metadata, streams};

/// Per-item outcome; errors are item-scoped and never abort siblings.
pub type ItemOutcome = Result<ResolvedItem, ResolveError>;

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub client: ClientConfig,
    /// Quality code used when a request carries no usable hint
    pub default_quality: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            default_quality: DEFAULT_QUALITY,
        }
    }
}

/// The resolution pipeline facade.
pub struct Resolver {
    client: BiliClient,
    default_quality: u32,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> ResolveResult<Self> {
        Ok(Self {
            client: BiliClient::new(config.client)?,
            default_quality: config.default_quality,
        })
    }

    /// Normalize arbitrary user input into a canonical id.
    ///
    /// Short links cost one network hop to resolve; everything else is
    /// pure scanning.
    pub async fn normalize(&self, input: &str) -> ResolveResult<BvId> {
        match scan_input(input) {
            IdScan::Canonical(bvid) => Ok(bvid),
            IdScan::ShortLink(token) => {
                let short_url = format!("{}/{}", self.client.config().short_link_base, token);
                let final_url = self.client.resolve_redirect(&short_url).await?;
                bili_models::ids::find_bvid(&final_url)
                    .ok_or_else(|| ResolveError::identifier(input))
            }
            IdScan::NotFound => Err(ResolveError::identifier(input)),
        }
    }

    /// Resolve a single input into a downloadable stream descriptor.
    ///
    /// The quality hint accepts a numeric code or a tier name; anything
    /// unrecognized (or absent) uses the configured default.
    pub async fn resolve_one(&self, input: &str, quality_hint: Option<&str>) -> ItemOutcome {
        let qn = quality_hint
            .and_then(parse_quality_hint)
            .unwrap_or(self.default_quality);

        let bvid = self.normalize(input).await?;
        let meta = metadata::fetch_one(&self.client, &bvid).await?;
        let resolved = streams::resolve(&self.client, &bvid, meta.cid, qn).await?;
        let selection = select_streams(&resolved, qn);
        Ok(assemble(meta, resolved, selection))
    }

    /// Resolve a keyed batch of inputs.
    ///
    /// The output key set equals the input key set exactly; failed keys
    /// carry their error, surviving keys their result. Stages run
    /// concurrently across items and synchronize before the next stage.
    pub async fn resolve_batch(
        &self,
        inputs: &HashMap<String, String>,
    ) -> HashMap<String, ItemOutcome> {
        info!(total = inputs.len(), "resolving batch");
        let mut results: HashMap<String, ItemOutcome> = HashMap::with_capacity(inputs.len());

        // Stage 1: normalize every input (short links may need a hop)
        let normalized = join_all(inputs.iter().map(|(key, raw)| async move {
            (key.clone(), self.normalize(raw).await)
        }))
        .await;

        let mut ids: HashMap<String, BvId> = HashMap::new();
        for (key, outcome) in normalized {
            match outcome {
                Ok(bvid) => {
                    ids.insert(key, bvid);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "input failed to normalize");
                    results.insert(key, Err(e));
                }
            }
        }

        // Stage 2: metadata fan-out over surviving keys
        let mut survivors: HashMap<String, ItemMetadata> = HashMap::new();
        for (key, outcome) in metadata::fetch_batch(&self.client, &ids).await {
            match outcome {
                Ok(meta) => {
                    survivors.insert(key, meta);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "metadata fetch failed");
                    results.insert(key, Err(e));
                }
            }
        }

        // Stage 3: stream resolution fan-out, batch-wide default quality
        let qn = self.default_quality;
        let fetched = join_all(survivors.iter().map(|(key, meta)| async move {
            let outcome = streams::resolve(&self.client, &meta.bvid, meta.cid, qn).await;
            (key.clone(), outcome)
        }))
        .await;

        // Stage 4: select and assemble for every fully resolved key
        for (key, outcome) in fetched {
            let Some(meta) = survivors.remove(&key) else {
                continue;
            };
            match outcome {
                Ok(resolved) => {
                    let selection = select_streams(&resolved, qn);
                    results.insert(key, Ok(assemble(meta, resolved, selection)));
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "stream resolution failed");
                    results.insert(key, Err(e));
                }
            }
        }

        debug!(
            total = inputs.len(),
            ok = results.values().filter(|r| r.is_ok()).count(),
            "batch resolved"
        );
        results
    }
}
