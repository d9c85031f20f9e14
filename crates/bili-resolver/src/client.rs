//! HTTP client wrapper for the upstream API.
//!
//! Every outbound request carries a fixed browser user-agent, the
//! origin-site referer and a bounded timeout. An optional credential cookie
//! is threaded through [`ClientConfig`] and forwarded verbatim; the client
//! never interprets it.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, LOCATION, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ResolveError, ResolveResult};

pub const DEFAULT_API_BASE: &str = "https://api.bilibili.com";
pub const DEFAULT_SHORT_LINK_BASE: &str = "https://b23.tv";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REFERER_VALUE: &str = "https://www.bilibili.com";

/// Client configuration.
///
/// Base URLs are configurable so tests can stand in for the upstream.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the metadata/stream API
    pub api_base: String,
    /// Base URL of the short-link service
    pub short_link_base: String,
    /// Opaque credential forwarded as the `Cookie` header value
    pub cookie: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            short_link_base: DEFAULT_SHORT_LINK_BASE.to_string(),
            cookie: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Standard envelope of the upstream API.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    message: Option<String>,
    data: Option<T>,
}

pub struct BiliClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl BiliClient {
    pub fn new(config: ClientConfig) -> ResolveResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(UA));
        headers.insert(REFERER, HeaderValue::from_static(REFERER_VALUE));

        // Redirects stay disabled; the one short-link hop is read manually
        // in `resolve_redirect`.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| ResolveError::fetch(format!("failed to build http client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET an API path and unwrap the `{code, message, data}` envelope.
    ///
    /// Non-2xx statuses, non-zero upstream codes and undecodable bodies all
    /// map to [`ResolveError::Fetch`].
    pub async fn get_data<T: DeserializeOwned>(&self, path_and_query: &str) -> ResolveResult<T> {
        let url = format!("{}{}", self.config.api_base, path_and_query);
        debug!(url = %url, "issuing api request");

        let mut request = self.http.get(&url);
        if let Some(cookie) = &self.config.cookie {
            request = request.header(COOKIE, cookie.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ResolveError::fetch(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::fetch(format!(
                "upstream returned status {status}"
            )));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ResolveError::fetch(format!("malformed response body: {e}")))?;

        if envelope.code != 0 {
            let message = envelope
                .message
                .unwrap_or_else(|| "unknown upstream error".to_string());
            return Err(ResolveError::fetch(format!(
                "upstream error {}: {}",
                envelope.code, message
            )));
        }

        envelope
            .data
            .ok_or_else(|| ResolveError::fetch("upstream response missing data"))
    }

    /// Resolve one redirect hop of a short link.
    ///
    /// Issues a HEAD request; a redirect status yields the `Location`
    /// value, anything else yields the input URL unchanged.
    pub async fn resolve_redirect(&self, url: &str) -> ResolveResult<String> {
        let response = self
            .http
            .head(url)
            .send()
            .await
            .map_err(|e| ResolveError::fetch(format!("redirect resolution failed: {e}")))?;

        if response.status().is_redirection() {
            if let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                debug!(from = %url, to = %location, "resolved short link");
                return Ok(location.to_string());
            }
        }
        Ok(url.to_string())
    }
}
