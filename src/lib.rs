pub mod config;
pub mod data;

/// Application name for config paths and the window title.
pub const APP_NAME: &str = "audio-catalog";
