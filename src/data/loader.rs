use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use log::{debug, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{MeasurementRow, MeasurementTable};

/// Columns every source must provide (exact names and casing).
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "year", "month", "day", "hour", "PM2.5", "PM10", "CO", "O3", "TEMP", "PRES", "DEWP", "station",
];

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

/// Where a measurement table comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// CSV served over HTTP(S).
    Url(String),
    /// Local `.csv`, `.json` or `.parquet` file.
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load a measurement table from either kind of source.
pub fn load(source: &DataSource) -> Result<MeasurementTable, LoadError> {
    let table = match source {
        DataSource::Url(url) => fetch_csv(url)?,
        DataSource::File(path) => load_file(path)?,
    };

    info!(
        "Loaded {} rows from {source}: {} stations, years {:?}",
        table.len(),
        table.stations().len(),
        table.years()
    );
    if table.is_empty() {
        warn!("{source} has a header but no rows");
    } else if table.temp_range().is_none() {
        warn!("No temperature values in {source}; every filter will come back empty");
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Download a CSV resource and parse it.
pub fn fetch_csv(url: &str) -> Result<MeasurementTable, LoadError> {
    let client = Client::builder()
        .build()
        .map_err(|e| LoadError::NetworkRequest(url.to_string(), e))?;
    fetch_csv_with(&client, url)
}

/// Download with a caller-supplied client.
pub fn fetch_csv_with(client: &Client, url: &str) -> Result<MeasurementTable, LoadError> {
    debug!("Fetching {url}");
    let response = client
        .get(url)
        .send()
        .map_err(|e| LoadError::NetworkRequest(url.to_string(), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let body = response
        .bytes()
        .map_err(|e| LoadError::NetworkRequest(url.to_string(), e))?;
    parse_csv(body.as_ref())
}

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

/// Load a measurement table from a file. Dispatch by extension.
pub fn load_file(path: &Path) -> Result<MeasurementTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || File::open(path).map_err(|e| LoadError::Io(path.to_path_buf(), e));

    match ext.as_str() {
        "csv" => parse_csv(open()?),
        "json" => parse_json(BufReader::new(open()?)),
        "parquet" | "pq" => load_parquet(open()?),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Record decoding shared by all formats
// ---------------------------------------------------------------------------

/// A source record before the derived date is attached.
#[derive(Debug, Deserialize)]
struct RawRow {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    #[serde(rename = "PM2.5", default, deserialize_with = "csv::invalid_option")]
    pm25: Option<f64>,
    #[serde(rename = "PM10", default, deserialize_with = "csv::invalid_option")]
    pm10: Option<f64>,
    #[serde(rename = "CO", default, deserialize_with = "csv::invalid_option")]
    co: Option<f64>,
    #[serde(rename = "O3", default, deserialize_with = "csv::invalid_option")]
    o3: Option<f64>,
    #[serde(rename = "TEMP", default, deserialize_with = "csv::invalid_option")]
    temp: Option<f64>,
    #[serde(rename = "PRES", default, deserialize_with = "csv::invalid_option")]
    pres: Option<f64>,
    #[serde(rename = "DEWP", default, deserialize_with = "csv::invalid_option")]
    dewp: Option<f64>,
    station: String,
}

impl RawRow {
    fn into_row(self, row: usize) -> Result<MeasurementRow, LoadError> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_opt(self.hour, 0, 0))
            .ok_or(LoadError::InvalidDate {
                row,
                year: self.year,
                month: self.month,
                day: self.day,
                hour: self.hour,
            })?;

        Ok(MeasurementRow {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            pm25: present(self.pm25),
            pm10: present(self.pm10),
            co: present(self.co),
            o3: present(self.o3),
            temp: present(self.temp),
            pres: present(self.pres),
            dewp: present(self.dewp),
            station: self.station,
            date,
        })
    }
}

/// `NaN` in the source means missing.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

fn check_columns<'a>(available: impl IntoIterator<Item = &'a str>) -> Result<(), LoadError> {
    let available: Vec<&str> = available.into_iter().collect();
    match REQUIRED_COLUMNS.iter().find(|c| !available.contains(*c)) {
        Some(missing) => Err(LoadError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse CSV with a header row. Columns beyond the required ones are ignored;
/// empty or unparseable numeric cells count as missing.
pub fn parse_csv<R: Read>(reader: R) -> Result<MeasurementTable, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    check_columns(reader.headers()?.iter())?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        rows.push(result?.into_row(row_no)?);
    }

    Ok(MeasurementTable::from_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "year": 2013, "month": 3, "day": 1, "hour": 0, "PM2.5": 4.0, ..., "station": "Dongsi" },
///   ...
/// ]
/// ```
pub fn parse_json<R: Read>(reader: R) -> Result<MeasurementTable, LoadError> {
    let records: Vec<JsonValue> = serde_json::from_reader(reader)?;

    if let Some(first) = records.first().and_then(JsonValue::as_object) {
        check_columns(first.keys().map(String::as_str))?;
    }

    let mut rows = Vec::with_capacity(records.len());
    for (row_no, record) in records.into_iter().enumerate() {
        let raw: RawRow = serde_json::from_value(record)?;
        rows.push(raw.into_row(row_no)?);
    }

    Ok(MeasurementTable::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Flat Parquet columns named like the CSV header. Numeric columns may be any
/// integer or float type; `station` any string type.
pub fn load_parquet(file: File) -> Result<MeasurementTable, LoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        decode_batch(&batch, &mut rows)?;
    }

    Ok(MeasurementTable::from_rows(rows))
}

fn decode_batch(batch: &RecordBatch, rows: &mut Vec<MeasurementRow>) -> Result<(), LoadError> {
    let schema = batch.schema();
    check_columns(schema.fields().iter().map(|f| f.name().as_str()))?;

    let column = |name: &str, to: &DataType| -> Result<ArrayRef, LoadError> {
        let idx = schema
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
        let col = batch.column(idx);
        if !arrow::compute::can_cast_types(col.data_type(), to) {
            return Err(LoadError::ColumnType {
                column: name.to_string(),
                data_type: format!("{:?}", col.data_type()),
            });
        }
        Ok(cast(col, to)?)
    };

    let ints: Vec<ArrayRef> = ["year", "month", "day", "hour"]
        .iter()
        .map(|name| column(name, &DataType::Int64))
        .collect::<Result<_, _>>()?;
    let floats: Vec<ArrayRef> = ["PM2.5", "PM10", "CO", "O3", "TEMP", "PRES", "DEWP"]
        .iter()
        .map(|name| column(name, &DataType::Float64))
        .collect::<Result<_, _>>()?;
    let station = column("station", &DataType::Utf8)?;
    let station = station.as_string::<i32>();

    let offset = rows.len();
    let int_at = |col: usize, row: usize| -> Result<i64, LoadError> {
        let arr = ints[col].as_primitive::<Int64Type>();
        if arr.is_null(row) {
            return Err(LoadError::NullValue {
                row: offset + row,
                column: ["year", "month", "day", "hour"][col].to_string(),
            });
        }
        Ok(arr.value(row))
    };
    let float_at = |col: usize, row: usize| -> Option<f64> {
        let arr = floats[col].as_primitive::<Float64Type>();
        (!arr.is_null(row)).then(|| arr.value(row))
    };

    for row in 0..batch.num_rows() {
        if station.is_null(row) {
            return Err(LoadError::NullValue {
                row: offset + row,
                column: "station".to_string(),
            });
        }
        // Out-of-range values surface as an invalid date.
        let raw = RawRow {
            year: i32::try_from(int_at(0, row)?).unwrap_or(i32::MAX),
            month: u32::try_from(int_at(1, row)?).unwrap_or(u32::MAX),
            day: u32::try_from(int_at(2, row)?).unwrap_or(u32::MAX),
            hour: u32::try_from(int_at(3, row)?).unwrap_or(u32::MAX),
            pm25: float_at(0, row),
            pm10: float_at(1, row),
            co: float_at(2, row),
            o3: float_at(3, row),
            temp: float_at(4, row),
            pres: float_at(5, row),
            dewp: float_at(6, row),
            station: station.value(row).to_string(),
        };
        rows.push(raw.into_row(offset + row)?);
    }

    Ok(())
}
