use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::state::Session;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable table of the rows passing the filters.
pub fn matching_files(ui: &mut Ui, session: &Session) {
    ui.heading("Matching Files");

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(TableColumn::remainder().at_least(160.0))
        .columns(TableColumn::auto().at_least(60.0), 7)
        .header(20.0, |mut header| {
            for title in [
                "Filename",
                "Duration (sec)",
                "Volume (dB)",
                "Channel",
                "File Type",
                "HA Type",
                "Microphone",
                "WOLA",
            ] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, session.visible_indices.len(), |mut row| {
                let Some(asset) = session
                    .visible_indices
                    .get(row.index())
                    .and_then(|&i| session.table.get(i))
                else {
                    return;
                };
                let cells = [
                    asset.filename.clone(),
                    asset.duration_sec.to_string(),
                    format!("{:.1}", asset.volume_db),
                    asset.channel.clone(),
                    asset.file_type.clone(),
                    asset.ha_type.clone(),
                    asset.mic_position.clone(),
                    asset.wola_type.to_string(),
                ];
                for text in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
