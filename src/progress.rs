//! Progress reporting for the two long-running stages.
//!
//! The grouper reports once per row and the enricher once per resolved
//! lookup. Callers that don't care pass [`no_progress`].
//!
//! # Example
//!
//! ```rust
//! use chatmerge::progress::{Progress, ProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     if let Some(pct) = progress.percentage() {
//!         println!("{}: {:.1}%", progress.stage, pct);
//!     }
//! });
//!
//! callback(Progress::new(Stage::Rows, 50, Some(200)));
//! ```

use std::fmt;
use std::sync::Arc;

/// Pipeline stage a progress update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    /// Classifying and grouping merged rows
    #[default]
    Rows,
    /// Fetching channel metadata
    Lookups,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Rows => write!(f, "Processing rows"),
            Stage::Lookups => write!(f, "Fetching channels"),
        }
    }
}

/// Progress information for one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub stage: Stage,

    /// Number of items processed so far.
    pub processed: usize,

    /// Total items to process, if known.
    pub total: Option<usize>,
}

impl Progress {
    pub fn new(stage: Stage, processed: usize, total: Option<usize>) -> Self {
        Self {
            stage,
            processed,
            total,
        }
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// Returns `None` if the total is not known.
    ///
    /// ```rust
    /// use chatmerge::progress::{Progress, Stage};
    ///
    /// assert_eq!(Progress::new(Stage::Rows, 5, Some(10)).percentage(), Some(50.0));
    /// assert_eq!(Progress::new(Stage::Rows, 5, None).percentage(), None);
    /// ```
    pub fn percentage(&self) -> Option<f64> {
        self.total.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.processed as f64 / total as f64) * 100.0
            }
        })
    }

    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.processed >= total)
    }

    pub fn remaining(&self) -> Option<usize> {
        self.total.map(|total| total.saturating_sub(self.processed))
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a callback that prints whole-percent steps to stderr.
///
/// Only every tenth percent (and completion) is printed so large inputs
/// don't flood the terminal.
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| {
        let Some(pct) = progress.percentage() else {
            return;
        };
        let step = progress.total.map_or(1, |total| (total / 10).max(1));
        if progress.is_complete() || progress.processed % step == 0 {
            eprintln!("   {}: {:.0}%", progress.stage, pct);
        }
    })
}
