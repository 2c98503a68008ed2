use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, Plot, PlotPoints, Points};

use crate::color::StationColors;
use crate::data::aggregate::SeriesTable;
use crate::data::model::ChartKind;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Pollutant chart
// ---------------------------------------------------------------------------

/// Render one pollutant's yearly means, one trace per station.
pub fn pollutant_chart(ui: &mut Ui, series: &SeriesTable, colors: &StationColors) {
    let pollutant = series.pollutant;
    ui.strong(pollutant.chart_title());

    if series.is_empty() {
        ui.allocate_ui([ui.available_width(), CHART_HEIGHT].into(), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No data for the current filters.");
            });
        });
        return;
    }

    let traces = series.by_station();

    Plot::new(("pollutant_chart", pollutant.column()))
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(pollutant.axis_label())
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            match pollutant.chart_kind() {
                ChartKind::Line => {
                    for (station, points) in &traces {
                        let color = colors.color_for(station);
                        let xy: Vec<[f64; 2]> =
                            points.iter().map(|&(year, mean)| [year as f64, mean]).collect();

                        plot_ui.line(
                            Line::new(PlotPoints::from(xy.clone()))
                                .name(*station)
                                .color(color)
                                .width(2.0),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(xy))
                                .name(*station)
                                .color(color)
                                .radius(3.5),
                        );
                    }
                }
                ChartKind::Bar => {
                    // Side-by-side bars per year, one slot per station.
                    let slots = traces.len().max(1) as f64;
                    let width = 0.8 / slots;
                    for (slot, (station, points)) in traces.iter().enumerate() {
                        let offset = (slot as f64 + 0.5) * width - 0.4;
                        let bars: Vec<Bar> = points
                            .iter()
                            .map(|&(year, mean)| {
                                Bar::new(year as f64 + offset, mean)
                                    .width(width)
                                    .name(format!("{station} {year}"))
                            })
                            .collect();
                        plot_ui.bar_chart(
                            BarChart::new(bars)
                                .name(*station)
                                .color(colors.color_for(station)),
                        );
                    }
                }
            }

            if let Some(level) = pollutant.danger_threshold() {
                plot_ui.hline(
                    HLine::new(level)
                        .name(format!("Dangerous ({level:.0})"))
                        .color(Color32::RED)
                        .width(1.0),
                );
            }
        });
}
