mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use app::CatalogApp;
use audio_catalog::config::Settings;
use state::AppState;

#[derive(Parser)]
#[command(name = "audio-catalog", version, about = "Browse and filter audio metadata catalogs")]
struct Cli {
    /// Catalog to open at start-up (overrides `data_file` in the config)
    data_file: Option<PathBuf>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field delimiter (defaults to tab for .tsv, comma otherwise)
    #[arg(long)]
    delimiter: Option<char>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref());
    if cli.delimiter.is_some() {
        settings.delimiter = cli.delimiter;
    }

    let mut state = AppState::new(settings);
    if let Some(path) = cli.data_file.or_else(|| state.settings.data_file.clone()) {
        state.open_reporting(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Audio Catalog",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogApp::new(state)))),
    )
}
