use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use audio_catalog::config::Settings;
use audio_catalog::data::{
    filtered_indices, loader, writer, Column, FilterCriteria, Summary, Table, YesNo,
};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Session: one opened catalog and its filter selections
// ---------------------------------------------------------------------------

pub struct Session {
    pub table: Table,
    pub source: PathBuf,

    /// Every observed value / full range, used to populate the widgets.
    pub options: FilterCriteria,

    /// The user's current selections.
    pub criteria: FilterCriteria,

    /// Indices of rows passing `criteria`, recomputed on every change.
    pub visible_indices: Vec<usize>,

    pub summary: Summary,

    /// Stable colours for the channel distribution.
    pub channel_colors: ColorMap,
}

impl Session {
    pub fn new(table: Table, source: PathBuf, hearing_aid: YesNo) -> Self {
        let options = FilterCriteria::unrestricted(&table, hearing_aid);
        let channel_colors = ColorMap::new(&table.unique_values(Column::Channel));
        let mut session = Session {
            criteria: options.clone(),
            options,
            table,
            source,
            visible_indices: Vec::new(),
            summary: Summary::of(std::iter::empty()),
            channel_colors,
        };
        session.refilter();
        session
    }

    /// Recompute `visible_indices` and `summary` after a criteria change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.table, &self.criteria);
        self.summary = Summary::of(self.visible_indices.iter().filter_map(|&i| self.table.get(i)));
    }

    /// Switch the hearing-aid value. Choosing "no" puts the hardware,
    /// microphone and receiver selections back to every observed value,
    /// since those widgets are hidden for that choice.
    pub fn set_hearing_aid(&mut self, value: YesNo) {
        self.criteria.hearing_aid = value;
        self.options.hearing_aid = value;
        if value == YesNo::No {
            self.criteria.reset_hearing_aid_details(&self.table);
        }
        self.refilter();
    }

    /// Put every selection back to the full set / range.
    pub fn reset_filters(&mut self) {
        self.criteria = self.options.clone();
        self.refilter();
    }

    pub fn visible_table(&self) -> Table {
        self.table.subset(&self.visible_indices)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded catalog (None until the user opens a file).
    pub session: Option<Session>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            session: None,
            status_message: None,
        }
    }

    fn delimiter_for(&self, path: &Path) -> u8 {
        self.settings
            .delimiter_byte()
            .unwrap_or_else(|| loader::delimiter_for(path))
    }

    /// Load a catalog and start a fresh session with default selections.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let table = loader::load_file_with(path, self.delimiter_for(path))
            .with_context(|| format!("loading {}", path.display()))?;

        log::info!(
            "Loaded {} files with columns {:?}",
            table.len(),
            table.columns()
        );
        self.session = Some(Session::new(
            table,
            path.to_path_buf(),
            self.settings.default_hearing_aid,
        ));
        self.status_message = None;
        Ok(())
    }

    /// Open `path`, keeping any failure as the status message instead of
    /// returning it.
    pub fn open_reporting(&mut self, path: &Path) {
        if let Err(e) = self.open(path) {
            log::error!("Failed to load file: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    /// Write the rows passing the current filters to `path`.
    pub fn export_visible(&mut self, path: &Path) -> Result<usize> {
        let session = self.session.as_ref().context("no catalog loaded")?;
        let visible = session.visible_table();
        writer::write_file(&visible, path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} files to {}", visible.len(), path.display());
        Ok(visible.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CATALOG: &str = "\
filename,duration_sec,channel,hearing_aid,volume_db,upload_date,audiogram_gains,file_type,ha_type,mic_position,Receiver,wola_type
audio_1.wav,10,ITE,yes,-20.0,2025-01-01,\"[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]\",wav,Blane,front,yes,16
audio_2.wav,50,CIC,yes,-40.0,2025-01-02,\"[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]\",pcm,Afton,rear,no,64
audio_3.wav,30,ITE,no,-30.0,2025-01-03,\"[2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2]\",wav,Genesis,inward,no,64
";

    fn opened() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        fs::write(&path, CATALOG).unwrap();
        let mut state = AppState::new(Settings::default());
        state.open(&path).unwrap();
        (dir, state)
    }

    #[test]
    fn opening_selects_default_hearing_aid_rows() {
        let (_dir, state) = opened();
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.visible_indices, vec![0, 1]);
        assert_eq!(session.summary.mean_duration, Some(30.0));
    }

    #[test]
    fn switching_hearing_aid_resets_details() {
        let (_dir, mut state) = opened();
        let session = state.session.as_mut().unwrap();
        session.criteria.mic_position.clear();
        session.refilter();
        assert!(session.summary.is_empty());
        assert_eq!(session.summary.mean_volume, None);

        session.set_hearing_aid(YesNo::No);
        assert_eq!(session.visible_indices, vec![2]);
    }

    #[test]
    fn reset_restores_full_selection() {
        let (_dir, mut state) = opened();
        let session = state.session.as_mut().unwrap();
        session.criteria.file_type.clear();
        session.refilter();
        assert!(session.visible_indices.is_empty());
        session.reset_filters();
        assert_eq!(session.visible_indices, vec![0, 1]);
    }

    #[test]
    fn export_writes_only_visible_rows() {
        let (dir, mut state) = opened();
        {
            let session = state.session.as_mut().unwrap();
            session.criteria.file_type.remove("pcm");
            session.refilter();
        }
        let out = dir.path().join("filtered.csv");
        assert_eq!(state.export_visible(&out).unwrap(), 1);

        let exported = loader::load_file(&out).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported.rows()[0].filename, "audio_1.wav");
    }

    #[test]
    fn load_failure_becomes_status_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "filename,duration_sec\na.wav,1\n").unwrap();

        let mut state = AppState::new(Settings::default());
        state.open_reporting(&path);
        assert!(state.session.is_none());
        let msg = state.status_message.unwrap();
        assert!(msg.contains("missing required column"));
    }
}
