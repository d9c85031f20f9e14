//! Request handlers.
//!
//! Single mode takes a `bv` id-or-link plus an optional `quality` hint;
//! batch mode (any `batch` parameter present) takes either a comma-separated
//! `bv` list or a JSON `list` array. Per-item failures serialize as
//! `{"error": reason}` inside the keyed results map; the request itself
//! still answers `code: 0`.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use bili_resolver::{ClientConfig, ItemOutcome, Resolver, ResolverConfig};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseParams {
    /// Video id or link; comma-separated list in batch mode
    pub bv: Option<String>,
    /// JSON array of inputs (batch mode alternative to `bv`)
    pub list: Option<String>,
    /// Quality code or tier name
    pub quality: Option<String>,
    /// Any value switches the request into batch mode
    pub batch: Option<String>,
    /// Opaque credential, forwarded verbatim
    pub cookie: Option<String>,
}

/// Response envelope shared by every answer.
fn envelope(code: i64, message: impl Into<String>, data: Value) -> Json<Value> {
    Json(json!({
        "code": code,
        "message": message.into(),
        "data": data,
    }))
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// `GET /api/parse`
pub async fn parse(State(state): State<AppState>, Query(params): Query<ParseParams>) -> Json<Value> {
    // A request-supplied cookie gets its own resolver so the credential
    // stays scoped to this call.
    let scoped;
    let resolver: &Resolver = match params.cookie.as_deref() {
        Some(cookie) if !cookie.is_empty() => {
            let config = ResolverConfig {
                client: ClientConfig {
                    cookie: Some(cookie.to_string()),
                    ..ClientConfig::default()
                },
                ..ResolverConfig::default()
            };
            match Resolver::new(config) {
                Ok(r) => {
                    scoped = r;
                    &scoped
                }
                Err(e) => {
                    warn!(error = %e, "failed to build scoped resolver");
                    return envelope(-500, "failed to initialize resolver", Value::Null);
                }
            }
        }
        _ => state.resolver.as_ref(),
    };

    if params.batch.is_some() {
        parse_batch(&state, resolver, &params).await
    } else {
        parse_single(resolver, &params).await
    }
}

async fn parse_single(resolver: &Resolver, params: &ParseParams) -> Json<Value> {
    let Some(input) = params.bv.as_deref().filter(|s| !s.is_empty()) else {
        return envelope(-1, "missing parameter: bv (video id or link)", Value::Null);
    };

    match resolver.resolve_one(input, params.quality.as_deref()).await {
        Ok(item) => envelope(0, "success", json!(item)),
        Err(e) => envelope(-1, e.reason(), Value::Null),
    }
}

async fn parse_batch(state: &AppState, resolver: &Resolver, params: &ParseParams) -> Json<Value> {
    let inputs: Vec<String> = if let Some(bv) = params.bv.as_deref() {
        bv.split(',').map(|s| s.trim().to_string()).collect()
    } else if let Some(list) = params.list.as_deref() {
        match serde_json::from_str(list) {
            Ok(values) => values,
            Err(_) => return envelope(-1, "parameter list is not a JSON array", Value::Null),
        }
    } else {
        return envelope(
            -1,
            "batch mode requires the bv parameter (comma separated) or the list parameter (JSON array)",
            Value::Null,
        );
    };

    if inputs.is_empty() {
        return envelope(-1, "batch list is empty", Value::Null);
    }
    if inputs.len() > state.config.max_batch_size {
        return envelope(
            -1,
            format!(
                "batch mode supports at most {} items",
                state.config.max_batch_size
            ),
            Value::Null,
        );
    }

    let keyed: HashMap<String, String> = inputs
        .into_iter()
        .enumerate()
        .map(|(idx, input)| (idx.to_string(), input))
        .collect();
    let total = keyed.len();

    let results = resolver.resolve_batch(&keyed).await;
    let success = results.values().filter(|r| r.is_ok()).count();
    let serialized: HashMap<&String, Value> = results
        .iter()
        .map(|(key, outcome)| (key, serialize_outcome(outcome)))
        .collect();

    envelope(
        0,
        "success",
        json!({
            "total": total,
            "success": success,
            "results": serialized,
        }),
    )
}

fn serialize_outcome(outcome: &ItemOutcome) -> Value {
    match outcome {
        Ok(item) => json!(item),
        Err(e) => json!({"error": e.reason()}),
    }
}
