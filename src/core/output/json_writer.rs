//! JSON output writer.

use std::fs;
use std::path::Path;

use crate::core::models::VideoAggregate;
use crate::error::{ChatmergeError, Result};

/// Serializes aggregates to a compact JSON array.
///
/// # Format
/// ```json
/// [{"date":"2024/01/01 09:00:00.000","videoId":"dQw4w9WgXcQ","chat":[...],"channelData":null}]
/// ```
pub fn to_json(videos: &[VideoAggregate]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(videos)?)
}

/// Writes aggregates to `path`, replacing any existing file.
pub fn write_json(videos: &[VideoAggregate], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_json(videos)?;
    fs::write(path, bytes).map_err(|e| ChatmergeError::output(path, e))
}
