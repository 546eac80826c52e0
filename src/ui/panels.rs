use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use audio_catalog::data::{NumericRange, YesNo};

use crate::state::{AppState, Session};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(session) = &mut state.session else {
        ui.label("No catalog loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if filter_widgets(ui, session) {
                session.refilter();
            }
        });
}

/// Returns whether any selection changed.
fn filter_widgets(ui: &mut Ui, session: &mut Session) -> bool {
    let mut changed = false;

    ui.strong("Search by filename");
    changed |= ui
        .text_edit_singleline(&mut session.criteria.filename_query)
        .changed();
    ui.add_space(6.0);

    // ---- Hearing aid and its dependent selections ----
    ui.strong("Hearing Aid");
    let current = session.criteria.hearing_aid;
    let mut chosen = current;
    egui::ComboBox::from_id_salt("hearing_aid")
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for value in [YesNo::Yes, YesNo::No] {
                ui.selectable_value(&mut chosen, value, value.as_str());
            }
        });
    if chosen != current {
        session.set_hearing_aid(chosen);
    }

    if session.criteria.hearing_aid == YesNo::Yes {
        let opts = &session.options;
        let crit = &mut session.criteria;
        changed |= check_list(ui, "Hearing Aid HW", &opts.ha_type, &mut crit.ha_type);
        changed |= check_list(ui, "Microphone", &opts.mic_position, &mut crit.mic_position);
        changed |= check_list(ui, "Receiver", &opts.receiver, &mut crit.receiver);
    }
    ui.separator();

    // ---- Numeric ranges ----
    let opts = &session.options;
    let crit = &mut session.criteria;

    ui.strong("Duration (sec)");
    changed |= range_sliders(ui, &opts.duration_sec, &mut crit.duration_sec);
    ui.strong("Volume (dB)");
    changed |= range_sliders(ui, &opts.volume_db, &mut crit.volume_db);
    ui.separator();

    // ---- Remaining categories ----
    changed |= check_list(ui, "File Type", &opts.file_type, &mut crit.file_type);
    changed |= check_list(ui, "WOLA Type", &opts.wola_type, &mut crit.wola_type);
    changed |= check_list(ui, "Channel", &opts.channel, &mut crit.channel);
    ui.separator();

    if ui.button("Reset filters").clicked() {
        session.reset_filters();
    }

    changed
}

/// Collapsible check list with All / None buttons. Returns whether the
/// selection changed.
fn check_list<T>(
    ui: &mut Ui,
    title: &str,
    all_values: &BTreeSet<T>,
    selected: &mut BTreeSet<T>,
) -> bool
where
    T: Ord + Clone + Display,
{
    let mut changed = false;
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    *selected = all_values.clone();
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                    changed = true;
                }
            });

            for val in all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    if checked {
                        selected.insert(val.clone());
                    } else {
                        selected.remove(val);
                    }
                    changed = true;
                }
            }
        });

    changed
}

/// Low / high sliders bounded by the column's observed range.
fn range_sliders<T>(ui: &mut Ui, bounds: &NumericRange<T>, range: &mut NumericRange<T>) -> bool
where
    T: egui::emath::Numeric,
{
    let span = bounds.low..=bounds.high;
    let low = ui.add(egui::Slider::new(&mut range.low, span.clone()).text("min"));
    let high = ui.add(egui::Slider::new(&mut range.high, span).text("max"));
    low.changed() || high.changed()
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.session.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{}: {} files loaded, {} matching",
                session
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                session.table.len(),
                session.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open audio catalog")
        .add_filter("Catalog files", &["csv", "tsv", "tab", "txt"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "tab"])
        .pick_file();

    if let Some(path) = file {
        state.open_reporting(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export matching files")
        .set_file_name("filtered.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .save_file();

    if let Some(path) = file {
        match state.export_visible(&path) {
            Ok(_) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
