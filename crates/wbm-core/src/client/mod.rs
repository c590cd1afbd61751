//! Archive client: timemap queries and snapshot fetches against the
//! Wayback Machine.
//!
//! All state lives in an explicit [`ClientConfig`]; requests go through a
//! [`Transport`] one at a time, with the refused-connection retry policy
//! applied around each attempt.

mod transport;

pub use transport::{CurlOptions, CurlTransport, HttpResponse, Transport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

use crate::config::WbmConfig;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::timemap::{
    jsonmap_url, link_timemap_url, LinkRecords, SnapshotRecords, TimeRange, TimemapError,
};
use crate::url_model;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Content type was JSON and the body parsed.
    Json(Value),
    /// Anything else, untouched.
    Raw(Vec<u8>),
}

/// Everything the client needs to know, passed in at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Archive root, e.g. `https://web.archive.org`.
    pub base_url: String,
    /// Verbose request/response trace.
    pub debug: bool,
    pub retry: RetryPolicy,
    pub user_agent: String,
    /// `None` keeps curl's default connect timeout.
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_config(cfg: &WbmConfig, debug: bool) -> Result<Self> {
        Ok(Self {
            base_url: cfg.base_url.clone(),
            debug,
            retry: cfg.retry_policy()?,
            user_agent: cfg.user_agent.clone(),
            connect_timeout: cfg.connect_timeout(),
        })
    }

    fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            user_agent: self.user_agent.clone(),
            connect_timeout: self.connect_timeout,
            verbose: self.debug,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let cfg = WbmConfig::default();
        Self {
            base_url: cfg.base_url,
            debug: false,
            retry: RetryPolicy::default(),
            user_agent: cfg.user_agent,
            connect_timeout: None,
        }
    }
}

/// Client for the archive's timemap and snapshot endpoints.
pub struct ArchiveClient<T = CurlTransport> {
    config: ClientConfig,
    transport: T,
}

impl ArchiveClient<CurlTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = CurlTransport::new(config.curl_options());
        Self { config, transport }
    }
}

impl<T: Transport> ArchiveClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url`, retrying refused connections per policy. HTTP error
    /// statuses come back as a normal response.
    pub fn request(&self, url: &str) -> Result<HttpResponse> {
        tracing::debug!("> {}", url);
        let response = run_with_retry(&self.config.retry, || self.transport.get(url))
            .with_context(|| format!("GET {}", url))?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "GET {} returned HTTP {}", url, response.status);
        }
        tracing::debug!(
            status = response.status,
            content_type = response.content_type.as_deref().unwrap_or("-"),
            bytes = response.body.len(),
            "< {}",
            url
        );
        Ok(response)
    }

    /// GET `url` and decode JSON bodies by content type.
    pub fn fetch(&self, url: &str) -> Result<(u32, Payload)> {
        let response = self.request(url)?;
        let status = response.status;
        if response.is_json() {
            let value: Value = serde_json::from_slice(&response.body)
                .with_context(|| format!("decode JSON from {}", url))?;
            return Ok((status, Payload::Json(value)));
        }
        Ok((status, Payload::Raw(response.body)))
    }

    /// Link-format timemap of `url`: original, timegate, self and mementos.
    pub fn timemap(&self, url: &str) -> Result<LinkRecords> {
        let response = self.request(&link_timemap_url(&self.config.base_url, url))?;
        Ok(LinkRecords::from_bytes(&response.body))
    }

    /// JSON timemap of every URL under the `url` prefix, optionally limited
    /// to a capture-time window.
    pub fn jsonmap(&self, url: &str, range: &TimeRange) -> Result<SnapshotRecords> {
        let query = jsonmap_url(&self.config.base_url, url, range)?;
        match self.fetch(&query)? {
            (_, Payload::Json(value)) => Ok(SnapshotRecords::decode(value)?),
            (status, Payload::Raw(_)) => Err(TimemapError::NotJson { status }.into()),
        }
    }

    /// Fetches a snapshot. A timestamped snapshot URL is rewritten to its
    /// `id_` form so the archive returns the original bytes.
    pub fn get(&self, url: &str) -> Result<HttpResponse> {
        self.request(&url_model::to_original_snapshot(url))
    }

    /// Original-bytes snapshot URL for a capture.
    pub fn snapshot_url(&self, timestamp: &str, original: &str) -> String {
        url_model::snapshot_url(&self.config.base_url, timestamp, original)
    }
}

#[cfg(test)]
pub(crate) mod fake;
