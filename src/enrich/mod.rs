//! Channel metadata enrichment.
//!
//! After grouping, every video key is resolved against the
//! [`MetadataStore`]. Keys the store already knows are applied directly;
//! the rest are fetched from a [`MetadataSource`], at most
//! [`EnrichConfig::concurrency`] at a time. Every lookup resolves exactly
//! once: a failure is recorded in the store as
//! [`CacheEntry::Unavailable`] and reported as a diagnostic, never raised.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "oembed")]
//! # async fn example(videos: &mut chatmerge::core::VideoIndex) -> chatmerge::Result<()> {
//! use chatmerge::cache::JsonFileCache;
//! use chatmerge::config::EnrichConfig;
//! use chatmerge::enrich::{Enricher, OEmbedClient};
//! use chatmerge::progress::no_progress;
//!
//! let config = EnrichConfig::new().with_concurrency(4);
//! let source = OEmbedClient::new(config.timeout())?;
//! let cache = JsonFileCache::load("cache.json");
//!
//! let report = Enricher::new(source, config).enrich(videos, &cache, &no_progress()).await;
//! println!("{} lookups, {} failed", report.lookups_issued, report.lookups_failed);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "oembed")]
mod oembed;

#[cfg(feature = "oembed")]
pub use oembed::{OEMBED_ENDPOINT, OEmbedClient};

use std::pin::pin;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, MetadataStore};
use crate::config::EnrichConfig;
use crate::core::diagnostics::Diagnostic;
use crate::core::grouper::VideoIndex;
use crate::core::models::VideoKey;
use crate::progress::{Progress, ProgressCallback, Stage};

/// Field of the oEmbed body holding the channel URL.
pub const AUTHOR_URL_FIELD: &str = "author_url";

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com/(@[^/?#\s]+)").expect("handle pattern is valid"));

/// Why a single lookup produced no metadata.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[cfg(feature = "oembed")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The body was not JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The lookup did not finish in time.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Any other source-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Something that can fetch channel metadata for a video.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetches the metadata blob for `key`.
    async fn fetch(&self, key: &VideoKey) -> Result<Value, LookupError>;
}

/// Counters and diagnostics from one enrichment phase.
#[derive(Debug, Default)]
pub struct EnrichReport {
    /// Keys answered from the store (either way)
    pub cache_hits: usize,
    pub lookups_issued: usize,
    pub lookups_succeeded: usize,
    pub lookups_failed: usize,
    /// Misses left unresolved because the phase ran offline
    pub skipped_offline: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rewrites `author_url` to the bare `@handle` when it contains one.
///
/// Returns `true` if the field was changed.
///
/// ```rust
/// use chatmerge::enrich::rewrite_author_url;
/// use serde_json::json;
///
/// let mut body = json!({"author_url": "https://www.youtube.com/@example"});
/// assert!(rewrite_author_url(&mut body));
/// assert_eq!(body["author_url"], "@example");
/// ```
pub fn rewrite_author_url(metadata: &mut Value) -> bool {
    let Some(field) = metadata.get_mut(AUTHOR_URL_FIELD) else {
        return false;
    };
    let handle = field
        .as_str()
        .and_then(|url| HANDLE_RE.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    match handle {
        Some(handle) => {
            *field = Value::String(handle);
            true
        }
        None => false,
    }
}

/// Drives the enrichment phase for one run.
pub struct Enricher<S> {
    source: S,
    config: EnrichConfig,
}

impl<S: MetadataSource> Enricher<S> {
    pub fn new(source: S, config: EnrichConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves channel metadata for every video in `videos`.
    pub async fn enrich(
        &self,
        videos: &mut VideoIndex,
        store: &dyn MetadataStore,
        progress: &ProgressCallback,
    ) -> EnrichReport {
        let mut report = EnrichReport::default();
        let mut cached = Vec::new();
        let mut misses = Vec::new();

        for key in videos.keys() {
            match store.get(key) {
                Some(CacheEntry::Unavailable) if self.config.retry_unavailable => {
                    misses.push(key.clone());
                }
                Some(entry) => cached.push((key.clone(), entry)),
                None => misses.push(key.clone()),
            }
        }

        report.cache_hits = cached.len();
        for (key, entry) in cached {
            if let Some(video) = videos.get_mut(key.as_str()) {
                video.channel_data = entry.into_metadata();
            }
        }

        if self.config.offline {
            report.skipped_offline = misses.len();
            debug!(misses = misses.len(), "offline, skipping lookups");
            return report;
        }

        let total = misses.len();
        report.lookups_issued = total;
        debug!(
            lookups = total,
            concurrency = self.config.effective_concurrency(),
            "starting channel lookups"
        );

        let mut results = pin!(
            stream::iter(misses)
                .map(|key| async move {
                    let result = self.lookup(&key).await;
                    (key, result)
                })
                .buffer_unordered(self.config.effective_concurrency())
        );

        let mut done = 0;
        while let Some((key, result)) = results.next().await {
            done += 1;
            match result {
                Ok(metadata) => {
                    report.lookups_succeeded += 1;
                    store.put(&key, CacheEntry::Resolved(metadata.clone()));
                    if let Some(video) = videos.get_mut(key.as_str()) {
                        video.channel_data = Some(metadata);
                    }
                }
                Err(e) => {
                    report.lookups_failed += 1;
                    warn!(video = %key, error = %e, "channel lookup failed");
                    store.put(&key, CacheEntry::Unavailable);
                    if let Some(video) = videos.get_mut(key.as_str()) {
                        video.channel_data = None;
                    }
                    report.diagnostics.push(Diagnostic::LookupFailed {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
            progress(Progress::new(Stage::Lookups, done, Some(total)));
        }

        info!(
            hits = report.cache_hits,
            succeeded = report.lookups_succeeded,
            failed = report.lookups_failed,
            "enrichment finished"
        );
        report
    }

    /// One lookup with the configured timeout and handle rewrite.
    async fn lookup(&self, key: &VideoKey) -> Result<Value, LookupError> {
        let timeout = self.config.timeout();
        let mut metadata = tokio::time::timeout(timeout, self.source.fetch(key))
            .await
            .map_err(|_| LookupError::Timeout(timeout))??;
        rewrite_author_url(&mut metadata);
        Ok(metadata)
    }
}
