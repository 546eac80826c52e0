use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;

use super::error::{CatalogError, Result};
use super::model::{AudioAsset, Column, Table, AUDIOGRAM_BANDS};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Pick the field delimiter from the file extension: tab for `.tsv` / `.tab`,
/// comma for everything else.
pub fn delimiter_for(path: &Path) -> u8 {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "tsv" | "tab" => b'\t',
        _ => b',',
    }
}

/// Load a catalog, choosing the delimiter from the extension.
pub fn load_file(path: &Path) -> Result<Table> {
    load_file_with(path, delimiter_for(path))
}

pub fn load_file_with(path: &Path, delimiter: u8) -> Result<Table> {
    let file = File::open(path)?;
    let table = load_reader(file, delimiter)?;
    log::debug!(
        "Parsed {} rows ({} columns) from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a delimited catalog: one header row, then one row per asset.
///
/// Every schema column must be present (in any order); other columns are kept
/// as raw text. Fails on the first value that cannot be coerced.
pub fn load_reader<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let index = SchemaIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let asset = parse_row(row_no, &record, &headers, &index)?;

        if !seen.insert(asset.filename.clone()) {
            return Err(CatalogError::DuplicateFilename {
                row: row_no,
                filename: asset.filename,
            });
        }
        rows.push(asset);
    }

    Ok(Table::new(headers, rows))
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Position of every schema column in the header, plus the leftover columns.
struct SchemaIndex {
    positions: BTreeMap<Column, usize>,
    extra: Vec<usize>,
}

impl SchemaIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let mut positions = BTreeMap::new();
        let mut extra = Vec::new();
        let mut seen = HashSet::new();

        for (i, name) in headers.iter().enumerate() {
            // cells are written back by header name, so names must be unique
            if !seen.insert(name.as_str()) {
                return Err(CatalogError::DuplicateColumn { name: name.clone() });
            }
            match Column::from_name(name) {
                Some(col) => {
                    positions.insert(col, i);
                }
                None => extra.push(i),
            }
        }

        let missing: Vec<String> = Column::ALL
            .iter()
            .filter(|c| !positions.contains_key(*c))
            .map(|c| c.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::schema(missing));
        }

        Ok(SchemaIndex { positions, extra })
    }

    fn position(&self, column: Column) -> usize {
        // resolve() guarantees every schema column is present
        self.positions[&column]
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

fn parse_row(
    row: usize,
    record: &csv::StringRecord,
    headers: &[String],
    index: &SchemaIndex,
) -> Result<AudioAsset> {
    let field = |col: Column| record.get(index.position(col)).unwrap_or("");

    let extra = index
        .extra
        .iter()
        .map(|&i| (headers[i].clone(), record.get(i).unwrap_or("").to_string()))
        .collect();

    Ok(AudioAsset {
        filename: parse_text(row, Column::Filename, field(Column::Filename))?,
        duration_sec: parse_value(row, Column::DurationSec, field(Column::DurationSec))?,
        channel: field(Column::Channel).trim().to_string(),
        hearing_aid: parse_value(row, Column::HearingAid, field(Column::HearingAid))?,
        volume_db: parse_value(row, Column::VolumeDb, field(Column::VolumeDb))?,
        upload_date: parse_date(row, field(Column::UploadDate))?,
        audiogram_gains: parse_gains(row, field(Column::AudiogramGains))?,
        file_type: field(Column::FileType).trim().to_string(),
        ha_type: field(Column::HaType).trim().to_string(),
        mic_position: field(Column::MicPosition).trim().to_string(),
        receiver: parse_value(row, Column::Receiver, field(Column::Receiver))?,
        wola_type: parse_value(row, Column::WolaType, field(Column::WolaType))?,
        extra,
    })
}

fn parse_text(row: usize, column: Column, raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(CatalogError::parse(row, column.name(), raw, "value is empty"));
    }
    Ok(raw.to_string())
}

fn parse_value<T>(row: usize, column: Column, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| CatalogError::parse(row, column.name(), raw, e.to_string()))
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part which is dropped.
fn parse_date(row: usize, raw: &str) -> Result<NaiveDate> {
    let date_part = raw
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or("");
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| CatalogError::parse(row, Column::UploadDate.name(), raw, e.to_string()))
}

/// Gains are stored as a list literal: `[1, -2, ...]`. A bare
/// whitespace-separated list (`[ 1 -2 ...]`) is accepted too.
fn parse_gains(row: usize, raw: &str) -> Result<[i32; AUDIOGRAM_BANDS]> {
    let column = Column::AudiogramGains.name();

    let values: Vec<i32> = match serde_json::from_str::<Vec<i32>>(raw.trim()) {
        Ok(v) => v,
        Err(_) => {
            let inner = raw
                .trim()
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or_else(|| CatalogError::parse(row, column, raw, "expected a [..] list"))?;
            inner
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|tok| !tok.is_empty())
                .map(|tok| {
                    tok.parse::<i32>().map_err(|e| {
                        CatalogError::parse(row, column, raw, format!("'{tok}': {e}"))
                    })
                })
                .collect::<Result<_>>()?
        }
    };

    let len = values.len();
    values.try_into().map_err(|_| {
        CatalogError::parse(
            row,
            column,
            raw,
            format!("expected {AUDIOGRAM_BANDS} gains, found {len}"),
        )
    })
}
