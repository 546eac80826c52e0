use eframe::egui;

use crate::state::AppState;
use crate::ui::{dashboard, files, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CatalogApp {
    pub state: AppState,
}

impl CatalogApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, matching files ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.state.session else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a catalog to browse files  (File → Open…)");
                });
                return;
            };
            dashboard::summary_metrics(ui, session);
            ui.separator();
            dashboard::distributions(ui, session);
            ui.separator();
            files::matching_files(ui, session);
        });
    }
}
