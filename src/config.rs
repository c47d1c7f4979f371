//! Configuration types for the pipeline stages.
//!
//! All structs are plain data with builder-style setters; none of them know
//! about the CLI. The defaults reproduce a YouTube Takeout live-chat export
//! processed in Japan Standard Time.
//!
//! - [`ColumnNames`] - header names of the six required CSV columns
//! - [`ArtifactNames`] - file names the pipeline writes into the input folder
//! - [`MergeConfig`] - CSV merger settings
//! - [`EnrichConfig`] - metadata lookup settings
//! - [`PipelineConfig`] - everything above plus the target timezone
//!
//! # Example
//!
//! ```rust
//! use chatmerge::config::{EnrichConfig, PipelineConfig};
//!
//! let config = PipelineConfig::new()
//!     .with_timezone("UTC")
//!     .with_enrich(EnrichConfig::new().with_concurrency(4).with_offline(true));
//!
//! assert_eq!(config.enrich.concurrency, 4);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default target timezone for normalized timestamps.
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// Header names of the six columns the pipeline reads.
///
/// Any other column in an input file is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub video_id: String,
    pub chat_id: String,
    pub timestamp: String,
    pub chat_text: String,
    pub channel_id: String,
    pub price: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            video_id: "動画 ID".to_string(),
            chat_id: "チャット ID".to_string(),
            timestamp: "チャット作成タイムスタンプ".to_string(),
            chat_text: "チャット テキスト".to_string(),
            channel_id: "チャンネル ID".to_string(),
            price: "価格".to_string(),
        }
    }
}

impl ColumnNames {
    /// Number of columns the pipeline requires.
    pub const COUNT: usize = 6;

    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the column names in canonical order.
    pub fn as_array(&self) -> [&str; Self::COUNT] {
        [
            &self.video_id,
            &self.chat_id,
            &self.timestamp,
            &self.chat_text,
            &self.channel_id,
            &self.price,
        ]
    }
}

/// File names of the artifacts the pipeline writes into the input folder.
///
/// The merger skips these names so a second run over the same folder never
/// ingests its own output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNames {
    /// Merged CSV audit file (default: `chat.csv`)
    pub merged_csv: String,

    /// Primary JSON output (default: `output.json`)
    pub output_json: String,

    /// Persisted channel metadata cache (default: `cache.json`)
    pub cache: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            merged_csv: "chat.csv".to_string(),
            output_json: "output.json".to_string(),
            cache: "cache.json".to_string(),
        }
    }
}

impl ArtifactNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `file_name` is one of the pipeline's own artifacts.
    pub fn is_artifact(&self, file_name: &str) -> bool {
        file_name == self.merged_csv || file_name == self.output_json || file_name == self.cache
    }
}

/// Configuration for the CSV merger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    pub columns: ColumnNames,
    pub artifacts: ArtifactNames,
}

impl MergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_artifacts(mut self, artifacts: ArtifactNames) -> Self {
        self.artifacts = artifacts;
        self
    }
}

/// Configuration for the channel metadata enrichment phase.
///
/// # Example
///
/// ```rust
/// use chatmerge::config::EnrichConfig;
///
/// let config = EnrichConfig::new()
///     .with_concurrency(16)
///     .with_timeout_secs(5);
///
/// assert_eq!(config.timeout().as_secs(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Maximum lookups in flight at once (default: 8, 0 is treated as 1)
    pub concurrency: usize,

    /// Per-lookup timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// Apply cached metadata only and issue no lookups (default: false)
    pub offline: bool,

    /// Look up keys again whose earlier lookup failed (default: false)
    pub retry_unavailable: bool,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout_secs: 10,
            offline: false,
            retry_unavailable: false,
        }
    }
}

impl EnrichConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of concurrent lookups.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the per-lookup timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Enables or disables offline mode.
    #[must_use]
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Enables or disables re-fetching keys cached as unavailable.
    #[must_use]
    pub fn with_retry_unavailable(mut self, retry: bool) -> Self {
        self.retry_unavailable = retry;
        self
    }

    /// Effective concurrency limit, never below one.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// IANA name of the zone timestamps are converted to
    pub timezone: String,

    pub merge: MergeConfig,

    pub enrich: EnrichConfig,

    /// Write the merged CSV audit file (default: true)
    pub write_merged_csv: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            merge: MergeConfig::default(),
            enrich: EnrichConfig::default(),
            write_merged_csv: true,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    #[must_use]
    pub fn with_merge(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    #[must_use]
    pub fn with_enrich(mut self, enrich: EnrichConfig) -> Self {
        self.enrich = enrich;
        self
    }

    #[must_use]
    pub fn with_merged_csv(mut self, enabled: bool) -> Self {
        self.write_merged_csv = enabled;
        self
    }

    /// Shorthand for the artifact names used by the merger and the pipeline.
    pub fn artifacts(&self) -> &ArtifactNames {
        &self.merge.artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_default_order() {
        let columns = ColumnNames::default();
        let names = columns.as_array();
        assert_eq!(names[0], "動画 ID");
        assert_eq!(names[3], "チャット テキスト");
        assert_eq!(names[5], "価格");
    }

    #[test]
    fn test_artifact_names_match() {
        let names = ArtifactNames::default();
        assert!(names.is_artifact("chat.csv"));
        assert!(names.is_artifact("output.json"));
        assert!(names.is_artifact("cache.json"));
        assert!(!names.is_artifact("takeout.csv"));
    }

    #[test]
    fn test_enrich_config_defaults() {
        let config = EnrichConfig::default();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(!config.offline);
        assert!(!config.retry_unavailable);
    }

    #[test]
    fn test_effective_concurrency_floor() {
        let config = EnrichConfig::new().with_concurrency(0);
        assert_eq!(config.effective_concurrency(), 1);
    }

    #[test]
    fn test_pipeline_config_builder() {
        let config = PipelineConfig::new()
            .with_timezone("UTC")
            .with_merged_csv(false)
            .with_enrich(EnrichConfig::new().with_offline(true));

        assert_eq!(config.timezone, "UTC");
        assert!(!config.write_merged_csv);
        assert!(config.enrich.offline);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = PipelineConfig::new().with_timezone("Europe/Berlin");
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.timezone, "Europe/Berlin");
        assert_eq!(back.merge.columns, ColumnNames::default());
    }
}
