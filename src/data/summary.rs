use std::collections::BTreeMap;

use super::model::{AudioAsset, CellValue, Column};

/// Headline numbers for a (filtered) set of rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_files: usize,
    /// `None` when there are no rows.
    pub mean_duration: Option<f64>,
    /// `None` when there are no rows or every volume is `NaN`.
    pub mean_volume: Option<f64>,
}

impl Summary {
    pub fn of<'a>(rows: impl IntoIterator<Item = &'a AudioAsset>) -> Self {
        let mut total_files = 0usize;
        let mut duration_sum = 0.0;
        let mut volume_sum = 0.0;
        let mut volume_count = 0usize;

        for row in rows {
            total_files += 1;
            duration_sum += row.duration_sec as f64;
            if !row.volume_db.is_nan() {
                volume_sum += row.volume_db;
                volume_count += 1;
            }
        }

        Summary {
            total_files,
            mean_duration: (total_files > 0).then(|| duration_sum / total_files as f64),
            mean_volume: (volume_count > 0).then(|| volume_sum / volume_count as f64),
        }
    }

    /// Nothing matched. A displayable state, not an error.
    pub fn is_empty(&self) -> bool {
        self.total_files == 0
    }
}

/// Number of rows per distinct value of `column`, sorted by value.
pub fn value_counts<'a>(
    rows: impl IntoIterator<Item = &'a AudioAsset>,
    column: Column,
) -> Vec<(CellValue, usize)> {
    let mut counts: BTreeMap<CellValue, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.value(column)).or_default() += 1;
    }
    counts.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::asset;

    #[test]
    fn means_over_rows() {
        let rows = vec![asset("a", 10, -20.0, "wav"), asset("b", 50, -40.0, "pcm")];
        let s = Summary::of(&rows);
        assert_eq!(s.total_files, 2);
        assert_eq!(s.mean_duration, Some(30.0));
        assert_eq!(s.mean_volume, Some(-30.0));
        assert!(!s.is_empty());
    }

    #[test]
    fn empty_input_has_no_means() {
        let s = Summary::of(std::iter::empty());
        assert!(s.is_empty());
        assert_eq!(s.mean_duration, None);
        assert_eq!(s.mean_volume, None);
    }

    #[test]
    fn nan_volumes_are_skipped() {
        let rows = vec![asset("a", 1, f64::NAN, "wav"), asset("b", 3, -10.0, "wav")];
        let s = Summary::of(&rows);
        assert_eq!(s.mean_duration, Some(2.0));
        assert_eq!(s.mean_volume, Some(-10.0));
    }

    #[test]
    fn counts_sorted_by_value() {
        let rows = vec![
            asset("a", 30, -1.0, "wav"),
            asset("b", 10, -1.0, "pcm"),
            asset("c", 30, -1.0, "wav"),
        ];
        assert_eq!(
            value_counts(&rows, Column::DurationSec),
            vec![(CellValue::Integer(10), 1), (CellValue::Integer(30), 2)]
        );
        assert_eq!(
            value_counts(&rows, Column::FileType),
            vec![(CellValue::Text("pcm".into()), 1), (CellValue::Text("wav".into()), 2)]
        );
    }
}
