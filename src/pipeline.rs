//! End-to-end processing of one folder.
//!
//! A run merges the folder's chat CSVs, groups the rows per video, enriches
//! each video with channel metadata and writes the artifacts next to the
//! inputs:
//!
//! | Artifact | Contents |
//! |----------|----------|
//! | `chat.csv` | Every merged input row (optional) |
//! | `output.json` | Aggregates, the primary output |
//! | `cache.json` | Channel metadata, reused by later runs |
//!
//! Only configuration errors and failure to write `output.json` abort a
//! run. Everything else ends up in [`RunReport::diagnostics`].
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "oembed")]
//! # async fn example() -> chatmerge::Result<()> {
//! use chatmerge::config::PipelineConfig;
//! use chatmerge::enrich::OEmbedClient;
//! use chatmerge::pipeline::Pipeline;
//!
//! let config = PipelineConfig::new().with_timezone("Europe/Berlin");
//! let source = OEmbedClient::new(config.enrich.timeout())?;
//! let report = Pipeline::new(config, source).run("takeout/").await?;
//!
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use tracing::{info, warn};

use crate::cache::{JsonFileCache, MetadataStore};
use crate::config::PipelineConfig;
use crate::core::diagnostics::Diagnostic;
use crate::core::grouper::{GroupStats, group_rows};
use crate::core::models::VideoAggregate;
use crate::core::output::{write_json, write_merged_csv};
use crate::enrich::{EnrichReport, Enricher, MetadataSource};
use crate::error::Result;
use crate::merger::merge_folder;
use crate::parsing::Normalizer;
use crate::progress::{ProgressCallback, no_progress};

/// Counters collected across all stages of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files_merged: usize,
    pub rows_merged: usize,
    pub group: GroupStats,
    pub cache_hits: usize,
    pub lookups_issued: usize,
    pub lookups_succeeded: usize,
    pub lookups_failed: usize,
    pub skipped_offline: usize,
}

impl RunStats {
    fn record_enrichment(&mut self, report: &EnrichReport) {
        self.cache_hits = report.cache_hits;
        self.lookups_issued = report.lookups_issued;
        self.lookups_succeeded = report.lookups_succeeded;
        self.lookups_failed = report.lookups_failed;
        self.skipped_offline = report.skipped_offline;
    }
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Aggregates in first-seen order, as written to `output.json`
    pub videos: Vec<VideoAggregate>,
    /// Diagnostics from every stage, in stage order
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RunStats,
}

impl RunReport {
    pub fn chat_count(&self) -> usize {
        self.videos.iter().map(|v| v.chat.len()).sum()
    }

    pub fn super_chat_count(&self) -> usize {
        self.videos.iter().map(VideoAggregate::super_chat_count).sum()
    }

    /// Videos that ended the run with channel metadata.
    pub fn enriched_count(&self) -> usize {
        self.videos.iter().filter(|v| v.channel_data.is_some()).count()
    }
}

/// One configured pipeline. Reusable across folders.
pub struct Pipeline<S> {
    config: PipelineConfig,
    enricher: Enricher<S>,
    progress: ProgressCallback,
}

impl<S: MetadataSource> Pipeline<S> {
    pub fn new(config: PipelineConfig, source: S) -> Self {
        let enricher = Enricher::new(source, config.enrich.clone());
        Self {
            config,
            enricher,
            progress: no_progress(),
        }
    }

    /// Sets the callback receiving row and lookup progress.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes `folder` and writes its artifacts.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timezone is unknown or
    /// `output.json` cannot be written.
    pub async fn run(&self, folder: impl AsRef<Path>) -> Result<RunReport> {
        let folder = folder.as_ref();
        let normalizer = Normalizer::from_zone_name(&self.config.timezone)?;
        let artifacts = self.config.artifacts();
        let output_path = folder.join(&artifacts.output_json);

        let cache = JsonFileCache::load(folder.join(&artifacts.cache));

        let mut report = RunReport::default();
        let merged = merge_folder(folder, &self.config.merge);
        report.diagnostics.extend(merged.diagnostics);

        let Some(table) = merged.table else {
            write_json(&[], &output_path)?;
            info!(folder = %folder.display(), "no input, wrote empty output");
            return Ok(report);
        };
        report.stats.files_merged = table.sources.len();
        report.stats.rows_merged = table.rows.len();

        if self.config.write_merged_csv && !table.rows.is_empty() {
            let csv_path = folder.join(&artifacts.merged_csv);
            if let Err(e) = write_merged_csv(&table, &self.config.merge.columns, &csv_path) {
                warn!(path = %csv_path.display(), error = %e, "cannot write merged CSV");
                report.diagnostics.push(Diagnostic::ArtifactWrite {
                    path: csv_path,
                    reason: e.to_string(),
                });
            }
        }

        let grouping = group_rows(&table.rows, &normalizer, &self.progress);
        report.diagnostics.extend(grouping.diagnostics);
        report.stats.group = grouping.stats;
        let mut videos = grouping.videos;

        let enrichment = self.enricher.enrich(&mut videos, &cache, &self.progress).await;
        report.stats.record_enrichment(&enrichment);
        report.diagnostics.extend(enrichment.diagnostics);

        if enrichment.lookups_issued > 0 {
            if let Err(e) = cache.flush() {
                warn!(path = %cache.path().display(), error = %e, "cannot persist cache");
                report.diagnostics.push(Diagnostic::CacheFlush {
                    path: cache.path().to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }

        report.videos = videos.into_videos();
        write_json(&report.videos, &output_path)?;
        info!(
            videos = report.videos.len(),
            chats = report.chat_count(),
            path = %output_path.display(),
            "wrote output"
        );
        Ok(report)
    }
}

/// Processes `folder` with the default configuration and live oEmbed lookups.
#[cfg(feature = "oembed")]
pub async fn process_folder(folder: impl AsRef<Path>) -> Result<Vec<VideoAggregate>> {
    let config = PipelineConfig::default();
    let source = crate::enrich::OEmbedClient::new(config.enrich.timeout())?;
    let report = Pipeline::new(config, source).run(folder).await?;
    Ok(report.videos)
}
