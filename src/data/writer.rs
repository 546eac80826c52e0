use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::error::Result;
use super::loader::delimiter_for;
use super::model::{AudioAsset, Column, Table};

/// Write the table to `path`, choosing the delimiter from the extension.
pub fn write_file(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_to(table, file, delimiter_for(path))?;
    log::debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Serialise the table with its header in source column order.
pub fn write_to<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    out.write_record(table.columns())?;
    for row in table.rows() {
        out.write_record(table.columns().iter().map(|name| cell_text(row, name)))?;
    }
    out.flush()?;
    Ok(())
}

fn cell_text(row: &AudioAsset, column_name: &str) -> String {
    match Column::from_name(column_name) {
        Some(col) => row.field_text(col),
        None => row.extra.get(column_name).cloned().unwrap_or_default(),
    }
}
