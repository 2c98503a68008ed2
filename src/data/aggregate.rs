use std::collections::{BTreeMap, HashSet};

use super::filter::{FilterCriteria, FilteredSubset, apply_filters};
use super::model::{MeasurementRow, MeasurementTable, Pollutant};

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// The three headline metrics. Undefined means are `None` ("N/A").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryStatistics {
    /// Distinct observation instants (derived date-times).
    pub distinct_days: usize,
    /// Mean temperature, 1 decimal.
    pub avg_temp: Option<f64>,
    /// Mean pressure, 2 decimals.
    pub avg_pressure: Option<f64>,
}

pub fn compute_summary(subset: &FilteredSubset<'_>) -> SummaryStatistics {
    if subset.is_empty() {
        return SummaryStatistics::default();
    }

    let distinct_days = subset
        .rows()
        .iter()
        .map(|r| r.date)
        .collect::<HashSet<_>>()
        .len();

    SummaryStatistics {
        distinct_days,
        avg_temp: mean(subset.rows().iter().map(|r| r.temp)).map(|v| round_to(v, 1)),
        avg_pressure: mean(subset.rows().iter().map(|r| r.pres)).map(|v| round_to(v, 2)),
    }
}

/// Arithmetic mean of the present values, `None` if there are none.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Round to `decimals` places from the exact binary value, ties to even.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

// ---------------------------------------------------------------------------
// Series tables
// ---------------------------------------------------------------------------

/// Mean pollutant level for one station in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub station: String,
    pub mean: f64,
}

/// Grouped means for one pollutant, ordered by year then station.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub pollutant: Pollutant,
    pub points: Vec<SeriesPoint>,
}

impl SeriesTable {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points regrouped per station (stations sorted, years ascending),
    /// one entry per chart trace.
    pub fn by_station(&self) -> BTreeMap<&str, Vec<(i32, f64)>> {
        let mut traces: BTreeMap<&str, Vec<(i32, f64)>> = BTreeMap::new();
        for p in &self.points {
            traces.entry(p.station.as_str()).or_default().push((p.year, p.mean));
        }
        traces
    }
}

pub fn compute_series(subset: &FilteredSubset<'_>, pollutant: Pollutant) -> SeriesTable {
    // (year, station) keys sort by year first, then station name.
    let mut groups: BTreeMap<(i32, &str), (f64, usize)> = BTreeMap::new();
    for row in subset.rows() {
        let Some(value) = pollutant.value(row) else {
            continue;
        };
        let acc = groups.entry(group_key(row)).or_insert((0.0, 0));
        acc.0 += value;
        acc.1 += 1;
    }

    let points = groups
        .into_iter()
        .map(|((year, station), (sum, count))| SeriesPoint {
            year,
            station: station.to_string(),
            mean: sum / count as f64,
        })
        .collect();

    SeriesTable { pollutant, points }
}

fn group_key(row: &MeasurementRow) -> (i32, &str) {
    (row.year, row.station.as_str())
}

// ---------------------------------------------------------------------------
// Dashboard view: one full pipeline run
// ---------------------------------------------------------------------------

/// Owned results of filtering and aggregating for one criteria value.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Rows in the filtered subset.
    pub matching_rows: usize,
    pub summary: SummaryStatistics,
    /// One table per pollutant, in [`Pollutant::ALL`] order.
    pub series: Vec<SeriesTable>,
}

impl DashboardView {
    pub fn build(table: &MeasurementTable, criteria: &FilterCriteria) -> Self {
        let subset = apply_filters(table, criteria);
        DashboardView {
            matching_rows: subset.len(),
            summary: compute_summary(&subset),
            series: Pollutant::ALL
                .iter()
                .map(|&p| compute_series(&subset, p))
                .collect(),
        }
    }

    pub fn series_for(&self, pollutant: Pollutant) -> Option<&SeriesTable> {
        self.series.iter().find(|s| s.pollutant == pollutant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::row;

    fn pm25(station: &str, year: i32, day: u32, hour: u32, value: Option<f64>) -> MeasurementRow {
        let mut r = row(station, year, day, hour, Some(12.0));
        r.pm25 = value;
        r
    }

    fn criteria(stations: &[&str], years: &[i32], min_temperature: f64) -> FilterCriteria {
        FilterCriteria {
            stations: stations.iter().map(|s| s.to_string()).collect(),
            years: years.iter().copied().collect(),
            min_temperature,
        }
    }

    #[test]
    fn pm25_series_groups_by_year_and_station() {
        let table = MeasurementTable::from_rows(vec![
            pm25("B", 2013, 1, 0, Some(30.0)),
            pm25("A", 2013, 1, 0, Some(10.0)),
            pm25("A", 2013, 1, 1, Some(20.0)),
            pm25("A", 2014, 1, 0, Some(99.0)),
        ]);
        let subset = apply_filters(&table, &criteria(&["A", "B"], &[2013], -100.0));
        let series = compute_series(&subset, Pollutant::Pm25);

        assert_eq!(
            series.points,
            vec![
                SeriesPoint {
                    year: 2013,
                    station: "A".into(),
                    mean: 15.0,
                },
                SeriesPoint {
                    year: 2013,
                    station: "B".into(),
                    mean: 30.0,
                },
            ]
        );
    }

    #[test]
    fn series_orders_by_year_then_station() {
        let table = MeasurementTable::from_rows(vec![
            pm25("C", 2015, 1, 0, Some(1.0)),
            pm25("A", 2015, 1, 0, Some(1.0)),
            pm25("B", 2013, 1, 0, Some(1.0)),
            pm25("A", 2014, 1, 0, Some(1.0)),
        ]);
        let subset = apply_filters(&table, &FilterCriteria::all(&table));
        let keys: Vec<_> = compute_series(&subset, Pollutant::Pm25)
            .points
            .into_iter()
            .map(|p| (p.year, p.station))
            .collect();
        assert_eq!(
            keys,
            vec![
                (2013, "B".to_string()),
                (2014, "A".to_string()),
                (2015, "A".to_string()),
                (2015, "C".to_string()),
            ]
        );
    }

    #[test]
    fn groups_without_values_are_omitted() {
        let table = MeasurementTable::from_rows(vec![
            pm25("A", 2013, 1, 0, None),
            pm25("A", 2013, 1, 1, None),
            pm25("B", 2013, 1, 0, Some(8.0)),
            pm25("B", 2013, 1, 1, None),
        ]);
        let subset = apply_filters(&table, &FilterCriteria::all(&table));
        let series = compute_series(&subset, Pollutant::Pm25);
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].station, "B");
        assert_eq!(series.points[0].mean, 8.0);
    }

    #[test]
    fn grouping_is_exhaustive_and_disjoint() {
        let rows: Vec<_> = (0..24)
            .map(|i| {
                let station = ["A", "B", "C"][i % 3];
                let year = 2013 + (i % 4) as i32;
                pm25(station, year, 1 + (i % 28) as u32, (i % 24) as u32, Some(i as f64))
            })
            .collect();
        let table = MeasurementTable::from_rows(rows);
        let subset = apply_filters(&table, &FilterCriteria::all(&table));

        let mut counts: BTreeMap<(i32, String), usize> = BTreeMap::new();
        for r in subset.rows() {
            *counts.entry((r.year, r.station.clone())).or_default() += 1;
        }
        let series = compute_series(&subset, Pollutant::Pm25);
        let keys: Vec<_> = series.points.iter().map(|p| (p.year, p.station.clone())).collect();

        assert_eq!(keys, counts.keys().cloned().collect::<Vec<_>>());
        assert_eq!(counts.values().sum::<usize>(), subset.len());
    }

    #[test]
    fn summary_counts_distinct_instants_and_rounds_means() {
        let mut rows = vec![
            row("A", 2013, 1, 0, Some(1.04)),
            row("B", 2013, 1, 0, Some(2.0)),
            row("A", 2013, 1, 1, Some(3.0)),
            row("A", 2013, 2, 0, None),
        ];
        rows[0].pres = Some(1012.333);
        rows[1].pres = Some(1013.0);
        let table = MeasurementTable::from_rows(rows);
        let subset = apply_filters(&table, &criteria(&["A", "B"], &[2013], -100.0));

        let summary = compute_summary(&subset);
        // Rows at the same instant from two stations count once.
        assert_eq!(summary.distinct_days, 2);
        assert_eq!(summary.avg_temp, Some(2.0));
        assert_eq!(summary.avg_pressure, Some(1012.67));
    }

    #[test]
    fn rounding_breaks_ties_to_even_on_the_exact_value() {
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(round_to(0.35, 1), 0.3);
        assert_eq!(round_to(0.15, 1), 0.1);
        assert_eq!(round_to(1012.125, 2), 1012.12);
        assert_eq!(round_to(-2.45, 1), -2.5);
        assert_eq!(round_to(7.0, 2), 7.0);
    }

    #[test]
    fn summary_means_round_like_the_dashboard_metrics() {
        let mut rows = vec![
            row("A", 2013, 1, 0, Some(0.2)),
            row("A", 2013, 1, 1, Some(0.3)),
        ];
        rows[0].pres = Some(1012.125);
        rows[1].pres = Some(1012.125);
        let table = MeasurementTable::from_rows(rows);
        let subset = apply_filters(&table, &FilterCriteria::all(&table));

        let summary = compute_summary(&subset);
        assert_eq!(summary.avg_temp, Some(0.2));
        assert_eq!(summary.avg_pressure, Some(1012.12));
    }

    #[test]
    fn summary_of_empty_subset_is_defined() {
        let table = MeasurementTable::from_rows(vec![row("A", 2013, 1, 0, Some(5.0))]);
        let subset = apply_filters(&table, &criteria(&["nowhere"], &[2013], -100.0));
        let summary = compute_summary(&subset);
        assert_eq!(summary, SummaryStatistics::default());
        assert_eq!(summary.distinct_days, 0);
        assert!(summary.avg_temp.is_none());
    }

    #[test]
    fn all_missing_pressure_is_none_not_nan() {
        let table = MeasurementTable::from_rows(vec![row("A", 2013, 1, 0, Some(5.0))]);
        let subset = apply_filters(&table, &FilterCriteria::all(&table));
        let summary = compute_summary(&subset);
        assert_eq!(summary.avg_temp, Some(5.0));
        assert_eq!(summary.avg_pressure, None);
    }

    #[test]
    fn view_for_unmatched_criteria_is_empty() {
        let table = MeasurementTable::from_rows(vec![pm25("A", 2013, 1, 0, Some(5.0))]);
        let view = DashboardView::build(&table, &criteria(&["Z"], &[2013], -100.0));
        assert_eq!(view.matching_rows, 0);
        assert_eq!(view.summary.distinct_days, 0);
        assert_eq!(view.series.len(), Pollutant::ALL.len());
        assert!(view.series.iter().all(SeriesTable::is_empty));
    }

    #[test]
    fn by_station_splits_traces() {
        let table = MeasurementTable::from_rows(vec![
            pm25("A", 2013, 1, 0, Some(1.0)),
            pm25("B", 2013, 1, 0, Some(2.0)),
            pm25("A", 2014, 1, 0, Some(3.0)),
        ]);
        let view = DashboardView::build(&table, &FilterCriteria::all(&table));
        let traces = view.series_for(Pollutant::Pm25).unwrap().by_station();
        assert_eq!(traces["A"], vec![(2013, 1.0), (2014, 3.0)]);
        assert_eq!(traces["B"], vec![(2013, 2.0)]);
    }
}
