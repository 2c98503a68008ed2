use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Station colours
// ---------------------------------------------------------------------------

/// Fixed colour per station, assigned over every station in the table so a
/// station keeps its colour when others are filtered out.
#[derive(Debug, Clone, Default)]
pub struct StationColors {
    mapping: BTreeMap<String, Color32>,
}

impl StationColors {
    pub fn new(stations: &BTreeSet<String>) -> Self {
        let mapping = stations
            .iter()
            .cloned()
            .zip(generate_palette(stations.len()))
            .collect();
        StationColors { mapping }
    }

    pub fn color_for(&self, station: &str) -> Color32 {
        self.mapping.get(station).copied().unwrap_or(Color32::GRAY)
    }
}
