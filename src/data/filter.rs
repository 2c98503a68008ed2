use std::collections::BTreeSet;

use super::model::{MeasurementRow, MeasurementTable};

// ---------------------------------------------------------------------------
// Filter criteria: the three sidebar selections
// ---------------------------------------------------------------------------

/// User-selected constraints. Rebuilt whole on every control change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub stations: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub min_temperature: f64,
}

impl FilterCriteria {
    /// Criteria matching the control defaults: every station, every year,
    /// threshold at the lowest observed temperature.
    pub fn all(table: &MeasurementTable) -> Self {
        FilterCriteria {
            stations: table.stations().clone(),
            years: table.years().clone(),
            min_temperature: table
                .temp_range()
                .map(|(lo, _)| lo)
                .unwrap_or(f64::NEG_INFINITY),
        }
    }

    /// Whether a single row passes all three predicates.
    ///
    /// A row without a temperature never passes the threshold.
    pub fn matches(&self, row: &MeasurementRow) -> bool {
        self.stations.contains(&row.station)
            && self.years.contains(&row.year)
            && row.temp.is_some_and(|t| t >= self.min_temperature)
    }
}

// ---------------------------------------------------------------------------
// Filtered subset
// ---------------------------------------------------------------------------

/// Rows of a [`MeasurementTable`] that passed a [`FilterCriteria`].
#[derive(Debug, Clone)]
pub struct FilteredSubset<'a> {
    rows: Vec<&'a MeasurementRow>,
}

impl<'a> FilteredSubset<'a> {
    pub fn rows(&self) -> &[&'a MeasurementRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Select the rows matching `criteria`, in table order.
pub fn apply_filters<'a>(
    table: &'a MeasurementTable,
    criteria: &FilterCriteria,
) -> FilteredSubset<'a> {
    FilteredSubset {
        rows: table.rows().iter().filter(|r| criteria.matches(r)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::row;

    fn table() -> MeasurementTable {
        MeasurementTable::from_rows(vec![
            row("A", 2013, 1, 0, Some(10.0)),
            row("A", 2013, 1, 1, None),
            row("A", 2014, 2, 0, Some(25.0)),
            row("B", 2013, 1, 0, Some(-5.0)),
            row("B", 2014, 3, 6, Some(18.5)),
            row("C", 2015, 4, 12, Some(30.0)),
        ])
    }

    fn criteria(stations: &[&str], years: &[i32], min_temperature: f64) -> FilterCriteria {
        FilterCriteria {
            stations: stations.iter().map(|s| s.to_string()).collect(),
            years: years.iter().copied().collect(),
            min_temperature,
        }
    }

    #[test]
    fn predicates_are_conjunctive() {
        let t = table();
        let subset = apply_filters(&t, &criteria(&["A", "B"], &[2013], 0.0));
        assert_eq!(subset.len(), 1);
        assert_eq!(subset.rows()[0].station, "A");
        assert_eq!(subset.rows()[0].temp, Some(10.0));
    }

    #[test]
    fn missing_temperature_never_passes() {
        let t = table();
        let subset = apply_filters(&t, &criteria(&["A"], &[2013], f64::NEG_INFINITY));
        assert_eq!(subset.len(), 1);
        assert!(subset.rows().iter().all(|r| r.temp.is_some()));
    }

    #[test]
    fn empty_selections_yield_empty_subset() {
        let t = table();
        assert!(apply_filters(&t, &criteria(&[], &[2013, 2014], -100.0)).is_empty());
        assert!(apply_filters(&t, &criteria(&["A", "B"], &[], -100.0)).is_empty());
    }

    #[test]
    fn unknown_station_yields_empty_subset() {
        let t = table();
        assert!(apply_filters(&t, &criteria(&["Z"], &[2013, 2014, 2015], -100.0)).is_empty());
    }

    #[test]
    fn threshold_above_observed_max_yields_empty_subset() {
        let t = table();
        let (_, max) = t.temp_range().unwrap();
        let c = criteria(&["A", "B", "C"], &[2013, 2014, 2015], max + 0.1);
        assert!(apply_filters(&t, &c).is_empty());
    }

    #[test]
    fn default_criteria_keep_every_row_with_temperature() {
        let t = table();
        let subset = apply_filters(&t, &FilterCriteria::all(&t));
        assert_eq!(subset.len(), t.len() - 1);
    }

    #[test]
    fn subset_is_drawn_from_table_without_duplicates() {
        let t = table();
        let c = criteria(&["A", "B", "C"], &[2013, 2014, 2015], -100.0);
        let subset = apply_filters(&t, &c);
        for r in subset.rows() {
            assert!(t.rows().iter().any(|orig| std::ptr::eq(orig, *r)));
        }
        let distinct: std::collections::HashSet<*const MeasurementRow> =
            subset.rows().iter().map(|r| *r as *const MeasurementRow).collect();
        assert_eq!(distinct.len(), subset.len());
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = table();
        let c = criteria(&["A", "C"], &[2013, 2015], 5.0);
        let once = apply_filters(&t, &c);
        let twice = apply_filters(&t, &c);
        assert_eq!(once.rows(), twice.rows());
    }

    #[test]
    fn filtering_is_monotonic() {
        let t = table();
        let narrow = criteria(&["A"], &[2013], -100.0);
        let wider_stations = criteria(&["A", "B"], &[2013], -100.0);
        let wider_years = criteria(&["A"], &[2013, 2014], -100.0);
        let base = apply_filters(&t, &narrow).len();
        assert!(apply_filters(&t, &wider_stations).len() >= base);
        assert!(apply_filters(&t, &wider_years).len() >= base);

        let all = criteria(&["A", "B", "C"], &[2013, 2014, 2015], -100.0);
        let mut last = usize::MAX;
        for threshold in [-100.0, -5.0, 0.0, 10.0, 18.5, 25.0, 30.0, 31.0] {
            let raised = FilterCriteria {
                min_temperature: threshold,
                ..all.clone()
            };
            let n = apply_filters(&t, &raised).len();
            assert!(n <= last);
            last = n;
        }
    }
}
