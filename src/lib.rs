//! # Chatmerge
//!
//! A Rust library for turning YouTube live-chat exports (Google Takeout CSV
//! files) into one JSON document per run, grouped by video and enriched with
//! channel metadata.
//!
//! ## Overview
//!
//! A run over a folder:
//! 1. **Merges** every chat CSV into one table ([`merger`])
//! 2. **Normalizes** timestamps into a target zone and **cleans** chat text
//!    ([`parsing`])
//! 3. **Classifies** rows as chats or super chats and **groups** them per
//!    video ([`core::grouper`])
//! 4. **Enriches** each video with channel metadata, through a persistent
//!    cache ([`enrich`], [`cache`])
//! 5. **Writes** `output.json`, plus the merged `chat.csv` for auditing
//!    ([`core::output`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "oembed")]
//! # async fn example() -> chatmerge::Result<()> {
//! let videos = chatmerge::pipeline::process_folder("takeout/").await?;
//! println!("{} videos", videos.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Metadata Sources
//!
//! Lookups go through the [`MetadataSource`](enrich::MetadataSource) trait,
//! so the pipeline runs just as well against a fixture or another service:
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use chatmerge::prelude::*;
//! use serde_json::{Value, json};
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl MetadataSource for Fixed {
//!     async fn fetch(&self, key: &VideoKey) -> std::result::Result<Value, LookupError> {
//!         Ok(json!({"title": key.to_string()}))
//!     }
//! }
//!
//! # async fn example() -> chatmerge::Result<()> {
//! let report = Pipeline::new(PipelineConfig::default(), Fixed).run("takeout/").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`config`] - Run configuration ([`PipelineConfig`](config::PipelineConfig) and friends)
//! - [`merger`] - Folder scan and CSV merge
//! - [`parsing`] - Timestamp normalization and chat text cleaning
//! - [`core`] - Models, grouping, diagnostics and output writers
//! - [`cache`] - [`MetadataStore`](cache::MetadataStore) and its backings
//! - [`enrich`] - Concurrent metadata lookups
//! - [`pipeline`] - The end-to-end run
//! - [`progress`] - Progress callbacks
//! - [`error`] - Unified error types ([`ChatmergeError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod enrich;
pub mod error;
pub mod merger;
pub mod parsing;
pub mod pipeline;
pub mod progress;

// Re-export the main types at the crate root for convenience
pub use core::models::VideoAggregate;
pub use error::{ChatmergeError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatmerge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::VideoAggregate;
    pub use crate::error::{ChatmergeError, Result};

    pub use crate::config::{ColumnNames, EnrichConfig, MergeConfig, PipelineConfig};

    pub use crate::core::diagnostics::Diagnostic;
    pub use crate::core::models::{ChatEntry, ChatKind, VideoKey};

    pub use crate::cache::{CacheEntry, JsonFileCache, MemoryCache, MetadataStore};
    pub use crate::enrich::{Enricher, LookupError, MetadataSource};
    #[cfg(feature = "oembed")]
    pub use crate::enrich::OEmbedClient;

    pub use crate::pipeline::{Pipeline, RunReport};
    pub use crate::progress::{Progress, ProgressCallback, Stage};
}
