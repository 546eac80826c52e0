use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use audio_catalog::data::{value_counts, CellValue, Column};

use crate::color::ColorMap;
use crate::state::Session;

const CHART_HEIGHT: f32 = 180.0;

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Total / average figures for the rows passing the filters.
pub fn summary_metrics(ui: &mut Ui, session: &Session) {
    let summary = &session.summary;

    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Total Files", summary.total_files.to_string());
        ui.add_space(24.0);
        metric(ui, "Average Duration (sec)", format_mean(summary.mean_duration));
        ui.add_space(24.0);
        metric(ui, "Average Volume (dB)", format_mean(summary.mean_volume));
    });

    if summary.is_empty() {
        ui.label(
            RichText::new("No files match the current filters.").color(Color32::YELLOW),
        );
    }
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).heading());
    });
}

/// Two decimals, or "n/a" for the mean of nothing.
pub fn format_mean(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Distribution charts
// ---------------------------------------------------------------------------

/// Channel, hearing-aid and duration distributions side by side.
pub fn distributions(ui: &mut Ui, session: &Session) {
    let rows: Vec<_> = session
        .visible_indices
        .iter()
        .filter_map(|&i| session.table.get(i))
        .collect();

    let channel = value_counts(rows.iter().copied(), Column::Channel);
    let hearing_aid = value_counts(rows.iter().copied(), Column::HearingAid);
    let duration = value_counts(rows.iter().copied(), Column::DurationSec);

    ui.columns(3, |cols: &mut [Ui]| {
        category_chart(
            &mut cols[0],
            "Channel Distribution",
            &channel,
            Some(&session.channel_colors),
        );
        category_chart(&mut cols[1], "Hearing Aid Distribution", &hearing_aid, None);
        duration_chart(&mut cols[2], &duration);
    });
}

/// One bar per category, placed at 0, 1, 2, ...; hover shows the name.
fn category_chart(
    ui: &mut Ui,
    title: &str,
    counts: &[(CellValue, usize)],
    colors: Option<&ColorMap>,
) {
    ui.strong(title);

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (value, n))| {
            let fill = colors
                .map(|cm| cm.color_for(value))
                .unwrap_or(Color32::LIGHT_BLUE);
            Bar::new(i as f64, *n as f64)
                .name(value.to_string())
                .fill(fill)
                .width(0.7)
        })
        .collect();

    Plot::new(title)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });

    let legend: Vec<String> = counts.iter().map(|(v, n)| format!("{v}: {n}")).collect();
    ui.label(RichText::new(legend.join("   ")).small());
}

/// Bars at the actual duration values.
fn duration_chart(ui: &mut Ui, counts: &[(CellValue, usize)]) {
    ui.strong("Duration Distribution");

    let bars: Vec<Bar> = counts
        .iter()
        .filter_map(|(value, n)| {
            let secs = value.as_f64()?;
            Some(Bar::new(secs, *n as f64).name(format!("{value} sec")).width(0.8))
        })
        .collect();

    Plot::new("duration_distribution")
        .height(CHART_HEIGHT)
        .x_axis_label("Duration (sec)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_formatting() {
        assert_eq!(format_mean(Some(12.346)), "12.35");
        assert_eq!(format_mean(Some(-30.0)), "-30.00");
        assert_eq!(format_mean(None), "n/a");
    }
}
