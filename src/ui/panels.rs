use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FilterCriteria;
use crate::data::loader::DataSource;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, image_url: Option<&str>) {
    if let Some(url) = image_url {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(url)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Filter:");
    ui.separator();

    // Widgets propose a replacement; the last one changed this frame wins.
    let mut next: Option<FilterCriteria> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Temperature threshold ----
            ui.strong("Temperature °C:");
            match state.table.temp_range() {
                Some((lo, hi)) => {
                    let mut threshold = state.criteria.min_temperature;
                    let slider = egui::Slider::new(&mut threshold, lo..=hi).suffix(" °C");
                    if ui.add(slider).changed() {
                        next = Some(FilterCriteria {
                            min_temperature: threshold,
                            ..state.criteria.clone()
                        });
                    }
                }
                None => {
                    ui.label("No temperature readings.");
                }
            }
            ui.separator();

            // ---- Stations ----
            let n_stations = state.table.stations().len();
            let header = format!("Station  ({}/{n_stations})", state.criteria.stations.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("stations")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            next = Some(state.with_all_stations(true));
                        }
                        if ui.small_button("None").clicked() {
                            next = Some(state.with_all_stations(false));
                        }
                    });
                    for station in state.table.stations() {
                        let mut checked = state.criteria.stations.contains(station);
                        let text = RichText::new(station).color(state.colors.color_for(station));
                        if ui.checkbox(&mut checked, text).changed() {
                            next = Some(state.with_station_toggled(station));
                        }
                    }
                });

            // ---- Years ----
            let n_years = state.table.years().len();
            let header = format!("Year  ({}/{n_years})", state.criteria.years.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("years")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            next = Some(state.with_all_years(true));
                        }
                        if ui.small_button("None").clicked() {
                            next = Some(state.with_all_years(false));
                        }
                    });
                    for &year in state.table.years() {
                        let mut checked = state.criteria.years.contains(&year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            next = Some(state.with_year_toggled(year));
                        }
                    }
                });

            ui.separator();
            selected_filters(ui, &state.criteria);
        });

    if let Some(criteria) = next {
        state.set_criteria(criteria);
    }
}

/// Echo the active selections under the controls.
fn selected_filters(ui: &mut Ui, criteria: &FilterCriteria) {
    ui.strong("Selected Filters:");
    let stations = criteria.stations.iter().cloned().collect::<Vec<_>>().join(", ");
    let years = criteria
        .years
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    ui.label(format!("Station(s): {stations}"));
    ui.label(format!("Year(s): {years}"));
    ui.label(format!("Temperature ≥: {:.1} °C", criteria.min_temperature));
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            let home = format!("Load from URL ({})", state.home);
            if ui
                .add_enabled(state.source != state.home, egui::Button::new(home))
                .clicked()
            {
                state.load_home();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} rows loaded, {} visible",
            state.table.len(),
            state.view.matching_rows
        ));

        ui.separator();
        ui.label(RichText::new(state.source.to_string()).weak());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open air quality measurements")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(DataSource::File(path));
    }
}
