mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, anyhow};
use app::AirQualityApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // A missing table aborts startup before any window opens.
    let table = data::loader::load(&config.source)
        .with_context(|| format!("loading air quality data from {}", config.source))?;
    let state = AppState::new(table, config.source.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.inner_size)
            .with_min_inner_size(config.min_inner_size),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can fetch and render the png/jpg images.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(AirQualityApp::new(state, config)))
        }),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
