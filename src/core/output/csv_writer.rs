//! Merged-CSV audit writer.

use std::fs::File;
use std::path::Path;

use crate::config::ColumnNames;
use crate::error::{ChatmergeError, Result};
use crate::merger::MergedTable;

/// Writes the merged rows as CSV.
///
/// # Format
/// - Uncompressed UTF-8, readable with the same reader as the inputs
/// - Delimiter: `,`
/// - Header: the six source column names, in [`ColumnNames`] order
/// - One record per merged row, cells as read
pub fn write_merged_csv(
    table: &MergedTable,
    columns: &ColumnNames,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ChatmergeError::output(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    write_records(&mut writer, table, columns)?;
    writer.flush().map_err(|e| ChatmergeError::output(path, e))?;
    Ok(())
}

/// Same as [`write_merged_csv`], returned as a string.
pub fn to_merged_csv(table: &MergedTable, columns: &ColumnNames) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_records(&mut writer, table, columns)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ChatmergeError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_records<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    table: &MergedTable,
    columns: &ColumnNames,
) -> Result<()> {
    writer.write_record(columns.as_array())?;
    for row in &table.rows {
        writer.write_record(row.to_cells())?;
    }
    Ok(())
}
