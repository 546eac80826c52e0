use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::YesNo;

/// Viewer settings loaded from a TOML file.
/// Every field has a default, so the file is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog opened at start-up when none is given on the command line.
    pub data_file: Option<PathBuf>,
    /// Field delimiter override. `None` picks it from the file extension.
    pub delimiter: Option<char>,
    /// Hearing-aid value selected when a catalog is opened.
    pub default_hearing_aid: YesNo,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            delimiter: None,
            default_hearing_aid: YesNo::Yes,
        }
    }
}

impl Settings {
    /// Load from `path`, or from `~/.config/audio-catalog/config.toml` when
    /// `path` is `None`. A missing file gives defaults; a file that can't be
    /// read or parsed logs a warning and gives defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(p) if p.exists() => p,
            _ => {
                log::debug!("No config file found, using defaults");
                return Self::default();
            }
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_toml(&contents) {
            Ok(settings) => {
                log::info!("Loaded config from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Delimiter as a byte. Non-ASCII delimiters fall back to `None`.
    pub fn delimiter_byte(&self) -> Option<u8> {
        self.delimiter.filter(char::is_ascii).map(|c| c as u8)
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::APP_NAME).join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn parses_all_fields() {
        let s = Settings::from_toml(
            r#"
data_file = "/data/audio_metadata.csv"
delimiter = ";"
default_hearing_aid = "no"
"#,
        )
        .unwrap();
        assert_eq!(s.data_file, Some(PathBuf::from("/data/audio_metadata.csv")));
        assert_eq!(s.delimiter_byte(), Some(b';'));
        assert_eq!(s.default_hearing_aid, YesNo::No);
    }

    #[test]
    fn bad_hearing_aid_value_is_rejected() {
        assert!(Settings::from_toml("default_hearing_aid = \"maybe\"").is_err());
    }

    #[test]
    fn non_ascii_delimiter_is_ignored() {
        let s = Settings {
            delimiter: Some('§'),
            ..Settings::default()
        };
        assert_eq!(s.delimiter_byte(), None);
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_hearing_aid = [").unwrap();
        assert_eq!(Settings::load(Some(&path)), Settings::default());

        std::fs::write(&path, "delimiter = \"\\t\"").unwrap();
        assert_eq!(Settings::load(Some(&path)).delimiter_byte(), Some(b'\t'));
    }
}
