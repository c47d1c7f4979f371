//! Pure per-cell parsing used by the grouper.
//!
//! Both functions return a `Result` so the caller decides what a failure
//! means: a bad timestamp drops the row, bad chat text becomes empty text.

pub mod text;
pub mod timestamp;

pub use text::{TextError, clean_chat_text, encode_fragment};
pub use timestamp::{NORMALIZED_FORMAT, Normalizer, TimestampError, normalize_timestamp, parse_timestamp};
