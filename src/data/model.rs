use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Pollutant – the four charted measurement columns
// ---------------------------------------------------------------------------

/// A pollutant column that gets a grouped-mean chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pollutant {
    Pm25,
    Pm10,
    Co,
    O3,
}

/// How a pollutant series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

impl Pollutant {
    /// Display order on the dashboard.
    pub const ALL: [Pollutant; 4] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Column name in the source data (exact casing).
    pub fn column(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    pub fn chart_title(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "Average PM2.5 Particles",
            Pollutant::Pm10 => "Average PM10 Particles",
            Pollutant::Co => "Average CO (Carbon Monoxide)",
            Pollutant::O3 => "Average O3 (Ozone)",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5 (μg/m³)",
            Pollutant::Pm10 => "PM10 (μg/m³)",
            Pollutant::Co => "Carbon Monoxide (μg/m³)",
            Pollutant::O3 => "Ozone (DU)",
        }
    }

    pub fn chart_kind(self) -> ChartKind {
        match self {
            Pollutant::O3 => ChartKind::Bar,
            _ => ChartKind::Line,
        }
    }

    /// Level at which the pollutant is flagged as dangerous, if any.
    pub fn danger_threshold(self) -> Option<f64> {
        match self {
            Pollutant::Pm25 => Some(50.0),
            Pollutant::Pm10 => Some(60.0),
            Pollutant::Co => Some(700.0),
            Pollutant::O3 => None,
        }
    }

    /// Read this pollutant's value from a row.
    pub fn value(self, row: &MeasurementRow) -> Option<f64> {
        match self {
            Pollutant::Pm25 => row.pm25,
            Pollutant::Pm10 => row.pm10,
            Pollutant::Co => row.co,
            Pollutant::O3 => row.o3,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// MeasurementRow – one observation
// ---------------------------------------------------------------------------

/// One hourly observation at one station.
///
/// Missing numeric readings (empty cells, `NaN`, JSON `null`) are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub co: Option<f64>,
    pub o3: Option<f64>,
    pub temp: Option<f64>,
    pub pres: Option<f64>,
    pub dewp: Option<f64>,
    pub station: String,
    /// Derived from `(year, month, day, hour)`.
    pub date: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// MeasurementTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded table with pre-computed control options.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    rows: Vec<MeasurementRow>,
    /// Sorted distinct station identifiers.
    stations: BTreeSet<String>,
    /// Sorted distinct years.
    years: BTreeSet<i32>,
    /// Observed `(min, max)` temperature, `None` if no row has one.
    temp_range: Option<(f64, f64)>,
}

impl MeasurementTable {
    /// Build the option indices from the loaded rows.
    pub fn from_rows(rows: Vec<MeasurementRow>) -> Self {
        let mut stations = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut temp_range: Option<(f64, f64)> = None;

        for row in &rows {
            if !stations.contains(&row.station) {
                stations.insert(row.station.clone());
            }
            years.insert(row.year);
            if let Some(t) = row.temp {
                temp_range = Some(match temp_range {
                    Some((lo, hi)) => (lo.min(t), hi.max(t)),
                    None => (t, t),
                });
            }
        }

        MeasurementTable {
            rows,
            stations,
            years,
            temp_range,
        }
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn stations(&self) -> &BTreeSet<String> {
        &self.stations
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    pub fn temp_range(&self) -> Option<(f64, f64)> {
        self.temp_range
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;

    /// Row builder for engine tests: only the fields the tests vary.
    pub(crate) fn row(
        station: &str,
        year: i32,
        day: u32,
        hour: u32,
        temp: Option<f64>,
    ) -> MeasurementRow {
        MeasurementRow {
            year,
            month: 3,
            day,
            hour,
            pm25: None,
            pm10: None,
            co: None,
            o3: None,
            temp,
            pres: None,
            dewp: None,
            station: station.to_string(),
            date: NaiveDate::from_ymd_opt(year, 3, day)
                .and_then(|d| d.and_hms_opt(hour, 0, 0))
                .unwrap(),
        }
    }

    #[test]
    fn from_rows_indexes_options() {
        let table = MeasurementTable::from_rows(vec![
            row("Wanliu", 2014, 1, 0, Some(4.5)),
            row("Aotizhongxin", 2013, 1, 0, Some(-3.0)),
            row("Wanliu", 2013, 2, 0, None),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.stations().iter().collect::<Vec<_>>(),
            vec!["Aotizhongxin", "Wanliu"]
        );
        assert_eq!(table.years().iter().copied().collect::<Vec<_>>(), vec![2013, 2014]);
        assert_eq!(table.temp_range(), Some((-3.0, 4.5)));
    }

    #[test]
    fn temp_range_absent_without_temperatures() {
        let table = MeasurementTable::from_rows(vec![row("A", 2013, 1, 0, None)]);
        assert_eq!(table.temp_range(), None);
        assert!(MeasurementTable::default().is_empty());
    }

    #[test]
    fn pollutant_reads_its_own_field() {
        let mut r = row("A", 2013, 1, 0, None);
        r.pm25 = Some(1.0);
        r.pm10 = Some(2.0);
        r.co = Some(3.0);
        r.o3 = Some(4.0);
        let values: Vec<_> = Pollutant::ALL.iter().map(|p| p.value(&r)).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(Pollutant::O3.chart_kind(), ChartKind::Bar);
        assert_eq!(Pollutant::O3.danger_threshold(), None);
        assert_eq!(Pollutant::Pm25.to_string(), "PM2.5");
    }
}
