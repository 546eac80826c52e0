use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

/// Number of per-band gains in an audiogram.
pub const AUDIOGRAM_BANDS: usize = 24;

// ---------------------------------------------------------------------------
// YesNo – boolean columns stored as "yes"/"no" text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(YesNo::Yes),
            "no" => Ok(YesNo::No),
            other => Err(format!("expected 'yes' or 'no', got '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the fixed schema
// ---------------------------------------------------------------------------

/// The twelve schema columns, spelled exactly as they appear in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Filename,
    DurationSec,
    Channel,
    HearingAid,
    VolumeDb,
    UploadDate,
    AudiogramGains,
    FileType,
    HaType,
    MicPosition,
    Receiver,
    WolaType,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Filename,
        Column::DurationSec,
        Column::Channel,
        Column::HearingAid,
        Column::VolumeDb,
        Column::UploadDate,
        Column::AudiogramGains,
        Column::FileType,
        Column::HaType,
        Column::MicPosition,
        Column::Receiver,
        Column::WolaType,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Filename => "filename",
            Column::DurationSec => "duration_sec",
            Column::Channel => "channel",
            Column::HearingAid => "hearing_aid",
            Column::VolumeDb => "volume_db",
            Column::UploadDate => "upload_date",
            Column::AudiogramGains => "audiogram_gains",
            Column::FileType => "file_type",
            Column::HaType => "ha_type",
            Column::MicPosition => "mic_position",
            Column::Receiver => "Receiver",
            Column::WolaType => "wola_type",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single typed cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, used for option lists and distributions.
/// Using `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Gains(Vec<i32>),
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                Text(_) => 2,
                Date(_) => 3,
                Gains(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Gains(a), Gains(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.1}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Gains(g) => f.write_str(&format_gains(g)),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` (used for chart axes).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

/// Render gains the way pandas writes a list cell: `[1, -2, 3]`.
pub fn format_gains(gains: &[i32]) -> String {
    let inner: Vec<String> = gains.iter().map(|g| g.to_string()).collect();
    format!("[{}]", inner.join(", "))
}

/// Whole numbers keep one decimal place (`-20.0`, not `-20`).
pub fn format_volume(volume_db: f64) -> String {
    if volume_db.is_finite() && volume_db.fract() == 0.0 {
        format!("{volume_db:.1}")
    } else {
        volume_db.to_string()
    }
}

// ---------------------------------------------------------------------------
// AudioAsset – one row of the catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AudioAsset {
    pub filename: String,
    pub duration_sec: i64,
    pub channel: String,
    pub hearing_aid: YesNo,
    pub volume_db: f64,
    pub upload_date: NaiveDate,
    pub audiogram_gains: [i32; AUDIOGRAM_BANDS],
    pub file_type: String,
    pub ha_type: String,
    pub mic_position: String,
    pub receiver: YesNo,
    pub wola_type: i64,
    /// Columns outside the schema, kept verbatim: column_name → raw text.
    pub extra: BTreeMap<String, String>,
}

impl AudioAsset {
    pub fn value(&self, column: Column) -> CellValue {
        match column {
            Column::Filename => CellValue::Text(self.filename.clone()),
            Column::DurationSec => CellValue::Integer(self.duration_sec),
            Column::Channel => CellValue::Text(self.channel.clone()),
            Column::HearingAid => CellValue::Text(self.hearing_aid.to_string()),
            Column::VolumeDb => CellValue::Float(self.volume_db),
            Column::UploadDate => CellValue::Date(self.upload_date),
            Column::AudiogramGains => CellValue::Gains(self.audiogram_gains.to_vec()),
            Column::FileType => CellValue::Text(self.file_type.clone()),
            Column::HaType => CellValue::Text(self.ha_type.clone()),
            Column::MicPosition => CellValue::Text(self.mic_position.clone()),
            Column::Receiver => CellValue::Text(self.receiver.to_string()),
            Column::WolaType => CellValue::Integer(self.wola_type),
        }
    }

    /// Cell text as written back to a delimited file.
    pub fn field_text(&self, column: Column) -> String {
        match column {
            Column::Filename => self.filename.clone(),
            Column::DurationSec => self.duration_sec.to_string(),
            Column::Channel => self.channel.clone(),
            Column::HearingAid => self.hearing_aid.to_string(),
            Column::VolumeDb => format_volume(self.volume_db),
            Column::UploadDate => self.upload_date.format("%Y-%m-%d").to_string(),
            Column::AudiogramGains => format_gains(&self.audiogram_gains),
            Column::FileType => self.file_type.clone(),
            Column::HaType => self.ha_type.clone(),
            Column::MicPosition => self.mic_position.clone(),
            Column::Receiver => self.receiver.to_string(),
            Column::WolaType => self.wola_type.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded catalog
// ---------------------------------------------------------------------------

/// The loaded catalog. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<AudioAsset>,
    /// Header names in source order (schema and extra columns).
    columns: Vec<String>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<AudioAsset>) -> Self {
        Table { rows, columns }
    }

    /// Table with the twelve schema columns in declaration order.
    pub fn with_schema_columns(rows: Vec<AudioAsset>) -> Self {
        let columns = Column::ALL.iter().map(|c| c.name().to_string()).collect();
        Table { rows, columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[AudioAsset] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&AudioAsset> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted set of distinct values in a schema column.
    pub fn unique_values(&self, column: Column) -> BTreeSet<CellValue> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }

    /// Rows at `indices`, in the given order, sharing this table's header.
    /// Out-of-range indices are skipped.
    pub fn subset(&self, indices: &[usize]) -> Table {
        Table {
            rows: indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect(),
            columns: self.columns.clone(),
        }
    }

    pub fn duration_bounds(&self) -> Option<(i64, i64)> {
        let min = self.rows.iter().map(|r| r.duration_sec).min()?;
        let max = self.rows.iter().map(|r| r.duration_sec).max()?;
        Some((min, max))
    }

    /// Min / max volume, ignoring `NaN`.
    pub fn volume_bounds(&self) -> Option<(f64, f64)> {
        let mut values = self.rows.iter().map(|r| r.volume_db).filter(|v| !v.is_nan());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn asset(filename: &str, duration_sec: i64, volume_db: f64, file_type: &str) -> AudioAsset {
        AudioAsset {
            filename: filename.to_string(),
            duration_sec,
            channel: "ITE".to_string(),
            hearing_aid: YesNo::Yes,
            volume_db,
            upload_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            audiogram_gains: [0; AUDIOGRAM_BANDS],
            file_type: file_type.to_string(),
            ha_type: "Genesis".to_string(),
            mic_position: "front".to_string(),
            receiver: YesNo::No,
            wola_type: 64,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn column_names_round_trip() {
        for col in Column::ALL {
            assert_eq!(Column::from_name(col.name()), Some(col));
        }
        assert_eq!(Column::Receiver.name(), "Receiver");
        assert_eq!(Column::from_name("receiver"), None);
    }

    #[test]
    fn yes_no_is_case_insensitive() {
        assert_eq!("Yes".parse::<YesNo>(), Ok(YesNo::Yes));
        assert_eq!(" no ".parse::<YesNo>(), Ok(YesNo::No));
        assert!("maybe".parse::<YesNo>().is_err());
    }

    #[test]
    fn unique_values_are_sorted_and_deduplicated() {
        let table = Table::with_schema_columns(vec![
            asset("a.wav", 10, -20.0, "wav"),
            asset("b.pcm", 50, -40.0, "pcm"),
            asset("c.wav", 10, -30.0, "wav"),
        ]);
        let types: Vec<CellValue> = table.unique_values(Column::FileType).into_iter().collect();
        assert_eq!(
            types,
            vec![CellValue::Text("pcm".into()), CellValue::Text("wav".into())]
        );
        assert_eq!(table.unique_values(Column::DurationSec).len(), 2);
    }

    #[test]
    fn bounds_of_empty_table_are_none() {
        let table = Table::default();
        assert_eq!(table.duration_bounds(), None);
        assert_eq!(table.volume_bounds(), None);
    }

    #[test]
    fn volume_bounds_skip_nan() {
        let table = Table::with_schema_columns(vec![
            asset("a.wav", 1, -20.0, "wav"),
            asset("b.wav", 2, f64::NAN, "wav"),
            asset("c.wav", 3, -45.5, "wav"),
        ]);
        assert_eq!(table.volume_bounds(), Some((-45.5, -20.0)));
        assert_eq!(table.duration_bounds(), Some((1, 3)));
    }

    #[test]
    fn subset_keeps_order_and_header() {
        let table = Table::new(
            vec!["filename".into(), "extra".into()],
            vec![asset("a.wav", 1, -1.0, "wav"), asset("b.wav", 2, -2.0, "wav")],
        );
        let sub = table.subset(&[1, 0, 7]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.rows()[0].filename, "b.wav");
        assert_eq!(sub.columns(), table.columns());
    }

    #[test]
    fn whole_volumes_keep_a_decimal_place() {
        assert_eq!(format_volume(-20.0), "-20.0");
        assert_eq!(format_volume(0.0), "0.0");
        assert_eq!(format_volume(-41.25), "-41.25");
        assert_eq!(format_volume(f64::NAN), "NaN");
    }

    #[test]
    fn gains_format_like_a_list_literal() {
        assert_eq!(format_gains(&[1, -2, 30]), "[1, -2, 30]");
        assert_eq!(format_gains(&[]), "[]");
    }
}
