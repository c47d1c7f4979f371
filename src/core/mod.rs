//! Core processing logic for chatmerge.
//!
//! This module contains:
//! - [`models`] - Rows, chat entries and per-video aggregates
//! - [`grouper`] - Classification and grouping of merged rows
//! - [`diagnostics`] - Non-fatal problems collected during a run
//! - [`output`] - Artifact writers (JSON, merged CSV)
//!
//! # Quick Start
//!
//! ```rust
//! use chatmerge::core::{RawRow, group_rows};
//! use chatmerge::parsing::Normalizer;
//! use chatmerge::progress::no_progress;
//!
//! let rows = vec![RawRow::from_cells(&[
//!     "dQw4w9WgXcQ", "c1", "2024-01-01T00:00:00Z", r#"{"text":"hi"}"#, "UC1", "",
//! ])];
//! let grouping = group_rows(&rows, &Normalizer::default(), &no_progress());
//! assert_eq!(grouping.videos.len(), 1);
//! ```

pub mod diagnostics;
pub mod grouper;
pub mod models;
pub mod output;

pub use diagnostics::Diagnostic;
pub use grouper::{GroupStats, Grouping, VideoIndex, classify_price, classify_row, group_rows};
pub use models::{
    ChatEntry, ChatKind, ChatText, RawRow, SuperChat, VideoAggregate, VideoKey,
    is_plausible_video_id,
};
pub use output::{to_json, to_merged_csv, write_json, write_merged_csv};
