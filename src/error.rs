//! Unified error types for chatmerge.
//!
//! [`ChatmergeError`] covers the few conditions that stop a run: bad
//! configuration and failure to write the primary output. Everything below
//! that level (a skipped file, a dropped row, a failed lookup) is reported as
//! a [`Diagnostic`](crate::core::diagnostics::Diagnostic) instead and never
//! shows up here.
//!
//! Row- and key-scoped failures have their own small error types next to the
//! code that produces them:
//! - [`TimestampError`](crate::parsing::TimestampError)
//! - [`TextError`](crate::parsing::TextError)
//! - [`LookupError`](crate::enrich::LookupError)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatmerge operations.
///
/// # Example
///
/// ```rust
/// use chatmerge::error::Result;
/// use chatmerge::VideoAggregate;
///
/// fn my_function() -> Result<Vec<VideoAggregate>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatmergeError>;

/// The error type for all fallible chatmerge operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatmergeError {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP client for metadata lookups could not be built.
    #[cfg(feature = "oembed")]
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The configured target timezone is not a known IANA zone name.
    #[error("Unknown timezone '{name}'. Expected an IANA name such as Asia/Tokyo")]
    InvalidTimezone {
        /// The zone name that was provided
        name: String,
    },

    /// Writing an output artifact failed.
    #[error("Failed to write {}: {source}", path.display())]
    Output {
        /// Destination of the artifact
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatmergeError {
    /// Creates an invalid timezone error.
    pub fn invalid_timezone(name: impl Into<String>) -> Self {
        ChatmergeError::InvalidTimezone { name: name.into() }
    }

    /// Creates an output error for the given destination.
    pub fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChatmergeError::Output {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatmergeError::Io(_))
    }

    /// Returns `true` if this is an invalid timezone error.
    pub fn is_invalid_timezone(&self) -> bool {
        matches!(self, ChatmergeError::InvalidTimezone { .. })
    }

    /// Returns `true` if writing an output artifact failed.
    pub fn is_output(&self) -> bool {
        matches!(self, ChatmergeError::Output { .. })
    }
}
