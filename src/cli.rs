//! Command-line interface definition using clap.
//!
//! [`Args`] maps one-to-one onto [`PipelineConfig`], so the binary stays a
//! thin shell around [`Pipeline`](crate::pipeline::Pipeline):
//!
//! ```rust
//! use chatmerge::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatmerge", "takeout/", "--concurrency", "4", "--offline"]);
//! let config = args.to_config();
//!
//! assert_eq!(config.enrich.concurrency, 4);
//! assert!(config.enrich.offline);
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_TIMEZONE, EnrichConfig, PipelineConfig};

/// Merge YouTube live-chat CSV exports into per-video JSON,
/// enriched with channel metadata.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatmerge")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatmerge takeout/
    chatmerge takeout/ --timezone Europe/Berlin
    chatmerge takeout/ --offline --no-merged-csv
    chatmerge takeout/ --concurrency 2 --timeout 30 --log-level debug")]
pub struct Args {
    /// Folder containing the chat CSV files; artifacts are written here
    pub folder: PathBuf,

    /// IANA timezone that timestamps are converted to
    #[arg(long, default_value = DEFAULT_TIMEZONE, value_name = "TZ")]
    pub timezone: String,

    /// Maximum number of metadata lookups in flight
    #[arg(long, default_value_t = 8, value_name = "N")]
    pub concurrency: usize,

    /// Per-lookup timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Use cached channel metadata only, make no network requests
    #[arg(long)]
    pub offline: bool,

    /// Look up again videos whose earlier lookup failed
    #[arg(long)]
    pub retry_unavailable: bool,

    /// Don't write the merged chat.csv
    #[arg(long)]
    pub no_merged_csv: bool,

    /// Don't print progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Log filter: a level (error, warn, info, debug, trace) or an EnvFilter directive
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,
}

impl Args {
    /// Builds the pipeline configuration these arguments describe.
    pub fn to_config(&self) -> PipelineConfig {
        let enrich = EnrichConfig::new()
            .with_concurrency(self.concurrency)
            .with_timeout_secs(self.timeout)
            .with_offline(self.offline)
            .with_retry_unavailable(self.retry_unavailable);

        PipelineConfig::new()
            .with_timezone(self.timezone.clone())
            .with_enrich(enrich)
            .with_merged_csv(!self.no_merged_csv)
    }
}
