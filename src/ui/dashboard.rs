use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::SummaryStatistics;
use crate::data::model::Pollutant;
use crate::state::AppState;
use crate::ui::plot;

const WARNING_COLOR: Color32 = Color32::from_rgb(0xE0, 0x9F, 0x1F);

// ---------------------------------------------------------------------------
// Central page
// ---------------------------------------------------------------------------

/// Render the main page: metrics, warnings, charts and the info footer.
pub fn main_page(ui: &mut Ui, state: &AppState, info_image_url: Option<&str>) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("Air Quality Dashboard").size(28.0));

            ui.separator();
            ui.heading("Summary Statistics");
            summary_row(ui, &state.view.summary);
            ui.add_space(6.0);
            danger_warnings(ui);

            ui.separator();
            ui.heading("Air Quality Trends Over Years");
            chart_pair(ui, state, Pollutant::Pm25, Pollutant::Pm10);

            ui.separator();
            ui.heading("Other Air Quality Metrics");
            chart_pair(ui, state, Pollutant::Co, Pollutant::O3);

            ui.separator();
            ui.heading("Air Quality Information");
            ui.label("The higher values of PM2.5, PM10, CO, and O3 indicate worse air quality.");
            if let Some(url) = info_image_url {
                ui.add(egui::Image::new(url).max_width(ui.available_width()));
            }
        });
}

/// Three metric tiles side by side.
fn summary_row(ui: &mut Ui, summary: &SummaryStatistics) {
    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Days in Total", summary.distinct_days.to_string());
        metric(&mut cols[1], "Average Temp °C", format_metric(summary.avg_temp, 1));
        metric(&mut cols[2], "Average Pressure", format_metric(summary.avg_pressure, 2));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

/// `None` renders as "N/A".
pub fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "N/A".to_string(),
    }
}

fn danger_warnings(ui: &mut Ui) {
    for p in Pollutant::ALL {
        if let Some(level) = p.danger_threshold() {
            let text = format!("⚠ If {p} levels: {level:.0} is Dangerous");
            ui.label(RichText::new(text).color(WARNING_COLOR));
        }
    }
}

fn chart_pair(ui: &mut Ui, state: &AppState, left: Pollutant, right: Pollutant) {
    ui.columns(2, |cols: &mut [Ui]| {
        for (col, pollutant) in cols.iter_mut().zip([left, right]) {
            if let Some(series) = state.view.series_for(pollutant) {
                plot::pollutant_chart(col, series, &state.colors);
            }
        }
    });
}
