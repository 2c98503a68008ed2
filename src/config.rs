use crate::data::loader::DataSource;

/// Default measurement source.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/reaperizy/csv/main/Dicoding%20CSV/main_data.csv";

const SIDEBAR_IMAGE_URL: &str = "https://teamnepalac.com.np/wp-content/uploads/2021/03/aqi.png";
const INFO_IMAGE_URL: &str = concat!(
    "https://www.ankitparakh.com/wp-content/uploads/2021/12/",
    "HEALTH-EFFECTS-OF-AIR-POLLUTION-WEB.jpg"
);

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings for the dashboard window.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Table loaded at startup and by File → Reload.
    pub source: DataSource,
    pub window_title: String,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
    /// Shown at the top of the filter panel.
    pub sidebar_image_url: Option<String>,
    /// Shown under "Air Quality Information".
    pub info_image_url: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Url(DEFAULT_SOURCE_URL.to_string()),
            window_title: "Air Quality Index".to_string(),
            inner_size: [1280.0, 900.0],
            min_inner_size: [720.0, 480.0],
            sidebar_image_url: Some(SIDEBAR_IMAGE_URL.to_string()),
            info_image_url: Some(INFO_IMAGE_URL.to_string()),
        }
    }
}
