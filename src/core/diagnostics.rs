//! Non-fatal problems collected during a run.
//!
//! Diagnostics are gathered by every stage and handed back as one batch in
//! the [`RunReport`](crate::pipeline::RunReport), so they never interleave
//! with progress output.

use std::fmt;
use std::path::PathBuf;

use crate::core::models::VideoKey;

/// A problem that was recovered from locally.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// No CSV file in the folder could be ingested.
    NoInput { folder: PathBuf },

    /// A file or folder could not be opened or read.
    FileUnreadable { path: PathBuf, reason: String },

    /// A CSV file contained a malformed record and was skipped.
    MalformedFile { path: PathBuf, reason: String },

    /// A CSV file has no header row.
    MissingHeader { path: PathBuf },

    /// A CSV file's required column count differs from the established header.
    ColumnMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// A row was dropped because its timestamp did not parse.
    InvalidTimestamp {
        row: usize,
        value: String,
        reason: String,
    },

    /// A metadata lookup failed; the video keeps no channel data.
    LookupFailed { key: VideoKey, reason: String },

    /// An auxiliary artifact (the merged CSV) could not be written.
    ArtifactWrite { path: PathBuf, reason: String },

    /// The metadata cache could not be persisted.
    CacheFlush { path: PathBuf, reason: String },
}

impl Diagnostic {
    /// Returns `true` for diagnostics that dropped input data.
    pub fn is_data_loss(&self) -> bool {
        matches!(
            self,
            Diagnostic::MalformedFile { .. }
                | Diagnostic::ColumnMismatch { .. }
                | Diagnostic::FileUnreadable { .. }
                | Diagnostic::MissingHeader { .. }
                | Diagnostic::InvalidTimestamp { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoInput { folder } => {
                write!(f, "no ingestible CSV files in {}", folder.display())
            }
            Diagnostic::FileUnreadable { path, reason } => {
                write!(f, "cannot read {}: {}", path.display(), reason)
            }
            Diagnostic::MalformedFile { path, reason } => {
                write!(f, "skipped {}: malformed CSV ({})", path.display(), reason)
            }
            Diagnostic::MissingHeader { path } => {
                write!(f, "skipped {}: no header row", path.display())
            }
            Diagnostic::ColumnMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "skipped {}: column count does not match header (header columns: {}, file columns: {})",
                path.display(),
                expected,
                actual
            ),
            Diagnostic::InvalidTimestamp { row, value, reason } => {
                write!(f, "skipping row {row} due to invalid timestamp '{value}': {reason}")
            }
            Diagnostic::LookupFailed { key, reason } => {
                write!(f, "channel lookup failed for video {key}: {reason}")
            }
            Diagnostic::ArtifactWrite { path, reason } => {
                write!(f, "could not write {}: {}", path.display(), reason)
            }
            Diagnostic::CacheFlush { path, reason } => {
                write!(f, "could not save cache {}: {}", path.display(), reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mismatch_display() {
        let d = Diagnostic::ColumnMismatch {
            path: PathBuf::from("b.csv"),
            expected: 6,
            actual: 5,
        };
        let s = d.to_string();
        assert!(s.contains("b.csv"));
        assert!(s.contains("header columns: 6"));
        assert!(s.contains("file columns: 5"));
    }

    #[test]
    fn test_invalid_timestamp_display() {
        let d = Diagnostic::InvalidTimestamp {
            row: 3,
            value: "yesterday".into(),
            reason: "input contains invalid characters".into(),
        };
        assert!(d.to_string().starts_with("skipping row 3"));
    }

    #[test]
    fn test_is_data_loss() {
        assert!(
            Diagnostic::MissingHeader {
                path: PathBuf::from("a.csv")
            }
            .is_data_loss()
        );
        assert!(
            !Diagnostic::LookupFailed {
                key: VideoKey::new("k"),
                reason: "timeout".into()
            }
            .is_data_loss()
        );
    }
}
