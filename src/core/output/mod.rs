//! Output artifact writers.
//!
//! - [`write_json`] / [`to_json`] - the primary artifact, a compact JSON
//!   array of [`VideoAggregate`](crate::core::models::VideoAggregate)
//! - [`write_merged_csv`] / [`to_merged_csv`] - the merged input rows, for
//!   auditing what was read
//!
//! # Example
//!
//! ```rust
//! # fn main() -> chatmerge::Result<()> {
//! use chatmerge::core::models::{VideoAggregate, VideoKey};
//! use chatmerge::core::output::to_json;
//!
//! let videos = vec![VideoAggregate::new(VideoKey::new("dQw4w9WgXcQ"), "2024/01/01 09:00:00.000")];
//! let bytes = to_json(&videos)?;
//! assert!(bytes.starts_with(b"[{\"date\""));
//! # Ok(())
//! # }
//! ```

mod csv_writer;
mod json_writer;

pub use csv_writer::{to_merged_csv, write_merged_csv};
pub use json_writer::{to_json, write_json};
