use std::collections::BTreeSet;

use log::debug;

use crate::color::StationColors;
use crate::data::aggregate::DashboardView;
use crate::data::filter::FilterCriteria;
use crate::data::loader::{self, DataSource};
use crate::data::model::MeasurementTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded measurement table, read-only until replaced wholesale.
    pub table: MeasurementTable,

    /// Where `table` came from.
    pub source: DataSource,

    /// Source loaded at startup; File → Load from URL returns to it.
    pub home: DataSource,

    /// Current sidebar selections.
    pub criteria: FilterCriteria,

    /// Pipeline output for `criteria` (cached).
    pub view: DashboardView,

    /// One colour per station in `table`.
    pub colors: StationColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build state for a freshly loaded table with every control at its default.
    pub fn new(table: MeasurementTable, source: DataSource) -> Self {
        let criteria = FilterCriteria::all(&table);
        let view = DashboardView::build(&table, &criteria);
        let colors = StationColors::new(table.stations());
        Self {
            table,
            home: source.clone(),
            source,
            criteria,
            view,
            colors,
            status_message: None,
        }
    }

    /// Replace the table and reset filters to the defaults for it.
    pub fn set_table(&mut self, table: MeasurementTable, source: DataSource) {
        let home = std::mem::replace(&mut self.home, source.clone());
        *self = Self::new(table, source);
        self.home = home;
    }

    /// Install new criteria, recomputing only when they differ.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria == self.criteria {
            return;
        }
        self.view = DashboardView::build(&self.table, &criteria);
        self.criteria = criteria;
        debug!(
            "Recomputed view: {} of {} rows match",
            self.view.matching_rows,
            self.table.len()
        );
    }

    /// Load `source`, keeping the current table if that fails.
    pub fn load(&mut self, source: DataSource) {
        match loader::load(&source) {
            Ok(table) => self.set_table(table, source),
            Err(e) => {
                let e = anyhow::Error::new(e).context(format!("loading {source}"));
                log::error!("Failed to load data: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Re-read the current source.
    pub fn reload(&mut self) {
        self.load(self.source.clone());
    }

    /// Go back to the startup source, e.g. after File → Open….
    pub fn load_home(&mut self) {
        self.load(self.home.clone());
    }

    /// Current criteria with one station toggled.
    pub fn with_station_toggled(&self, station: &str) -> FilterCriteria {
        let mut next = self.criteria.clone();
        if !next.stations.remove(station) {
            next.stations.insert(station.to_string());
        }
        next
    }

    /// Current criteria with one year toggled.
    pub fn with_year_toggled(&self, year: i32) -> FilterCriteria {
        let mut next = self.criteria.clone();
        if !next.years.remove(&year) {
            next.years.insert(year);
        }
        next
    }

    /// Current criteria with every station selected, or none.
    pub fn with_all_stations(&self, selected: bool) -> FilterCriteria {
        FilterCriteria {
            stations: if selected {
                self.table.stations().clone()
            } else {
                BTreeSet::new()
            },
            ..self.criteria.clone()
        }
    }

    /// Current criteria with every year selected, or none.
    pub fn with_all_years(&self, selected: bool) -> FilterCriteria {
        FilterCriteria {
            years: if selected {
                self.table.years().clone()
            } else {
                BTreeSet::new()
            },
            ..self.criteria.clone()
        }
    }
}
