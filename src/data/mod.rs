/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  URL (.csv) / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → MeasurementTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ MeasurementTable  │  Vec<MeasurementRow>, station/year/temp options
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → FilteredSubset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  SummaryStatistics + one SeriesTable per pollutant
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
