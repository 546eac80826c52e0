use std::collections::BTreeSet;

use super::model::{AudioAsset, CellValue, Column, Table, YesNo};

// ---------------------------------------------------------------------------
// Numeric ranges
// ---------------------------------------------------------------------------

/// Inclusive `[low, high]` range. `low > high` admits nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange<T> {
    pub low: T,
    pub high: T,
}

impl<T: PartialOrd> NumericRange<T> {
    pub fn new(low: T, high: T) -> Self {
        NumericRange { low, high }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.low <= *value && *value <= self.high
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// One restriction per filterable column. Every restriction always applies:
/// "no restriction" is spelled as the full set of observed values or the
/// column's `[min, max]`, see [`FilterCriteria::unrestricted`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub hearing_aid: YesNo,
    pub duration_sec: NumericRange<i64>,
    pub volume_db: NumericRange<f64>,
    pub channel: BTreeSet<String>,
    pub file_type: BTreeSet<String>,
    pub ha_type: BTreeSet<String>,
    pub mic_position: BTreeSet<String>,
    pub receiver: BTreeSet<YesNo>,
    pub wola_type: BTreeSet<i64>,
    /// Case-insensitive substring of `filename`; empty admits every row.
    pub filename_query: String,
}

impl FilterCriteria {
    /// Criteria that admit every row of `table` whose hearing-aid value is
    /// `hearing_aid`.
    pub fn unrestricted(table: &Table, hearing_aid: YesNo) -> Self {
        let (dur_lo, dur_hi) = table.duration_bounds().unwrap_or((0, 0));
        let (vol_lo, vol_hi) = table.volume_bounds().unwrap_or((0.0, 0.0));
        FilterCriteria {
            hearing_aid,
            duration_sec: NumericRange::new(dur_lo, dur_hi),
            volume_db: NumericRange::new(vol_lo, vol_hi),
            channel: text_values(table, Column::Channel),
            file_type: text_values(table, Column::FileType),
            ha_type: text_values(table, Column::HaType),
            mic_position: text_values(table, Column::MicPosition),
            receiver: table.rows().iter().map(|r| r.receiver).collect(),
            wola_type: table.rows().iter().map(|r| r.wola_type).collect(),
            filename_query: String::new(),
        }
    }

    /// Reset the hearing-aid-specific selections (hardware, microphone,
    /// receiver) to every observed value.
    pub fn reset_hearing_aid_details(&mut self, table: &Table) {
        self.ha_type = text_values(table, Column::HaType);
        self.mic_position = text_values(table, Column::MicPosition);
        self.receiver = table.rows().iter().map(|r| r.receiver).collect();
    }

    /// Whether a single row satisfies every restriction.
    pub fn matches(&self, asset: &AudioAsset) -> bool {
        asset.hearing_aid == self.hearing_aid
            && self.duration_sec.contains(&asset.duration_sec)
            && self.volume_db.contains(&asset.volume_db)
            && self.file_type.contains(&asset.file_type)
            && self.ha_type.contains(&asset.ha_type)
            && self.mic_position.contains(&asset.mic_position)
            && self.wola_type.contains(&asset.wola_type)
            && self.receiver.contains(&asset.receiver)
            && self.channel.contains(&asset.channel)
            && self.matches_filename(&asset.filename)
    }

    fn matches_filename(&self, filename: &str) -> bool {
        let query = self.filename_query.trim();
        query.is_empty() || filename.to_lowercase().contains(&query.to_lowercase())
    }
}

fn text_values(table: &Table, column: Column) -> BTreeSet<String> {
    table
        .unique_values(column)
        .into_iter()
        .map(|v| match v {
            CellValue::Text(s) => s,
            other => other.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Indices of rows passing every restriction, in table order.
pub fn filtered_indices(table: &Table, criteria: &FilterCriteria) -> Vec<usize> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, asset)| criteria.matches(asset))
        .map(|(i, _)| i)
        .collect()
}

/// The matching rows as a new table with the same header.
pub fn filter_table(table: &Table, criteria: &FilterCriteria) -> Table {
    table.subset(&filtered_indices(table, criteria))
}
