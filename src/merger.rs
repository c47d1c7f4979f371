//! CSV merger: folder of Takeout chat exports -> one ordered table.
//!
//! Files are visited in file-name order. Each file is read as strings,
//! restricted to the six configured columns, and either merged whole or
//! skipped whole with a [`Diagnostic`]. The merger never fails; a folder
//! with nothing usable produces [`MergeOutcome::table`] `== None`.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatmerge::config::MergeConfig;
//! use chatmerge::merger::merge_folder;
//!
//! let outcome = merge_folder("takeout/chats", &MergeConfig::default());
//! match outcome.table {
//!     Some(table) => println!("{} rows from {} files", table.rows.len(), table.sources.len()),
//!     None => println!("nothing to do"),
//! }
//! for d in &outcome.diagnostics {
//!     eprintln!("{d}");
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{ColumnNames, MergeConfig};
use crate::core::diagnostics::Diagnostic;
use crate::core::models::RawRow;

const UTF8_BOM: char = '\u{feff}';

/// All rows that survived validation, in file then row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedTable {
    /// Column names, established from the first non-empty file
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Files whose rows were merged
    pub sources: Vec<PathBuf>,
}

/// Result of merging a folder.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// `None` means no file was usable
    pub table: Option<MergedTable>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Contents of one validated file.
struct FileContents {
    /// How many required columns the file has
    selected: usize,
    rows: Vec<RawRow>,
}

/// Lists the CSV files in `folder` the merger would read, sorted by name.
///
/// The pipeline's own artifacts are excluded.
pub fn list_input_files(folder: &Path, config: &MergeConfig) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_none_or(|name| !config.artifacts.is_artifact(name))
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Reads and merges every eligible CSV file in `folder`.
pub fn merge_folder(folder: impl AsRef<Path>, config: &MergeConfig) -> MergeOutcome {
    let folder = folder.as_ref();
    let mut outcome = MergeOutcome::default();

    let files = match list_input_files(folder, config) {
        Ok(files) => files,
        Err(e) => {
            warn!(folder = %folder.display(), error = %e, "cannot enumerate input folder");
            outcome.diagnostics.push(Diagnostic::FileUnreadable {
                path: folder.to_path_buf(),
                reason: e.to_string(),
            });
            outcome.diagnostics.push(Diagnostic::NoInput {
                folder: folder.to_path_buf(),
            });
            return outcome;
        }
    };

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut sources = Vec::new();

    for path in files {
        let contents = match read_file(&path, &config.columns) {
            Ok(contents) => contents,
            Err(diagnostic) => {
                warn!("{diagnostic}");
                outcome.diagnostics.push(diagnostic);
                continue;
            }
        };

        let expected = header.as_ref().map_or(ColumnNames::COUNT, Vec::len);
        if contents.selected != expected {
            let diagnostic = Diagnostic::ColumnMismatch {
                path: path.clone(),
                expected,
                actual: contents.selected,
            };
            warn!("{diagnostic}");
            outcome.diagnostics.push(diagnostic);
            continue;
        }

        if header.is_none() && !contents.rows.is_empty() {
            header = Some(config.columns.as_array().map(str::to_string).to_vec());
        }

        debug!(file = %path.display(), rows = contents.rows.len(), "merged file");
        rows.extend(contents.rows);
        sources.push(path);
    }

    let Some(header) = header else {
        warn!(folder = %folder.display(), "no ingestible CSV files");
        outcome.diagnostics.push(Diagnostic::NoInput {
            folder: folder.to_path_buf(),
        });
        return outcome;
    };

    let before = rows.len();
    rows.retain(|row| !row.is_blank());
    if rows.len() < before {
        debug!(dropped = before - rows.len(), "dropped blank rows");
    }

    info!(rows = rows.len(), files = sources.len(), "merged CSV input");
    outcome.table = Some(MergedTable {
        header,
        rows,
        sources,
    });
    outcome
}

/// Reads one file, selecting the required columns by header name.
///
/// A file missing some required column returns early with its `selected`
/// count and no rows; the caller turns that into a column mismatch.
fn read_file(path: &Path, columns: &ColumnNames) -> Result<FileContents, Diagnostic> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| Diagnostic::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let headers = reader.headers().map_err(|e| malformed(path, &e))?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Diagnostic::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let positions: Vec<Option<usize>> = columns
        .as_array()
        .iter()
        .map(|wanted| {
            headers
                .iter()
                .position(|h| h.trim_start_matches(UTF8_BOM).trim() == *wanted)
        })
        .collect();

    let selected = positions.iter().flatten().count();
    if selected != ColumnNames::COUNT {
        return Ok(FileContents {
            selected,
            rows: Vec::new(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| malformed(path, &e))?;
        let cells: Vec<&str> = positions
            .iter()
            .map(|pos| pos.and_then(|i| record.get(i)).unwrap_or(""))
            .collect();
        rows.push(RawRow::from_cells(&cells));
    }

    Ok(FileContents { selected, rows })
}

fn malformed(path: &Path, err: &csv::Error) -> Diagnostic {
    Diagnostic::MalformedFile {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
