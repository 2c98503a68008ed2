use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use parquet::arrow::ArrowWriter;

const CSV_PATH: &str = "sample_air_quality.csv";
const PARQUET_PATH: &str = "sample_air_quality.parquet";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// A reading that goes missing about 2% of the time.
    fn reading(&mut self, mean: f64, std_dev: f64) -> Option<f64> {
        if self.next_f64() < 0.02 {
            None
        } else {
            Some((self.gauss(mean, std_dev) * 10.0).round() / 10.0)
        }
    }

    /// A concentration, never negative.
    fn concentration(&mut self, mean: f64, std_dev: f64) -> Option<f64> {
        self.reading(mean, std_dev).map(|v| v.max(0.0))
    }
}

/// Per-station pollution level relative to the average.
const STATIONS: [(&str, f64); 4] = [
    ("Aotizhongxin", 1.1),
    ("Changping", 0.8),
    ("Dongsi", 1.25),
    ("Huairou", 0.7),
];

#[derive(Default)]
struct Columns {
    year: Vec<i32>,
    month: Vec<i32>,
    day: Vec<i32>,
    hour: Vec<i32>,
    pm25: Vec<Option<f64>>,
    pm10: Vec<Option<f64>>,
    co: Vec<Option<f64>>,
    o3: Vec<Option<f64>>,
    temp: Vec<Option<f64>>,
    pres: Vec<Option<f64>>,
    dewp: Vec<Option<f64>>,
    station: Vec<String>,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let mut cols = Columns::default();

    // One reading every 6 hours, March 2013 through February 2017.
    let start = NaiveDate::from_ymd_opt(2013, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");
    let steps = 4 * 365 * 4;

    for step in 0..steps {
        let at = start + Duration::hours(6 * step);
        // Winter is cold and polluted, summer warm with more ozone.
        let season = (2.0 * std::f64::consts::PI * (at.ordinal() as f64 - 200.0) / 365.0).cos();
        let trend = 1.0 - 0.05 * (at.year() - 2013) as f64;

        for &(name, level) in &STATIONS {
            let pm25 = 80.0 * level * trend * (1.0 - 0.4 * season);
            cols.year.push(at.year());
            cols.month.push(at.month() as i32);
            cols.day.push(at.day() as i32);
            cols.hour.push(at.hour() as i32);
            cols.pm25.push(rng.concentration(pm25, pm25 * 0.3));
            cols.pm10.push(rng.concentration(pm25 * 1.3, pm25 * 0.35));
            cols.co.push(rng.concentration(1200.0 * level * trend, 300.0));
            cols.o3.push(rng.concentration(55.0 + 35.0 * season, 15.0));
            cols.temp.push(rng.reading(13.0 + 15.0 * season, 3.0));
            cols.pres.push(rng.reading(1012.0 - 10.0 * season, 4.0));
            cols.dewp.push(rng.reading(2.0 + 14.0 * season, 4.0));
            cols.station.push(name.to_string());
        }
    }

    write_csv(&cols);
    write_parquet(&cols);

    println!(
        "Wrote {} measurements for {} stations to {CSV_PATH} and {PARQUET_PATH}",
        cols.station.len(),
        STATIONS.len()
    );
}

fn write_csv(cols: &Columns) {
    let mut writer = csv::Writer::from_path(CSV_PATH).expect("Failed to create CSV file");
    writer
        .write_record([
            "No", "year", "month", "day", "hour", "PM2.5", "PM10", "CO", "O3", "TEMP", "PRES",
            "DEWP", "station",
        ])
        .expect("Failed to write CSV header");

    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for i in 0..cols.station.len() {
        writer
            .write_record([
                (i + 1).to_string(),
                cols.year[i].to_string(),
                cols.month[i].to_string(),
                cols.day[i].to_string(),
                cols.hour[i].to_string(),
                cell(cols.pm25[i]),
                cell(cols.pm10[i]),
                cell(cols.co[i]),
                cell(cols.o3[i]),
                cell(cols.temp[i]),
                cell(cols.pres[i]),
                cell(cols.dewp[i]),
                cols.station[i].clone(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

fn write_parquet(cols: &Columns) {
    let ints = |v: &Vec<i32>| Arc::new(Int32Array::from(v.clone())) as ArrayRef;
    let floats = |v: &Vec<Option<f64>>| Arc::new(Float64Array::from(v.clone())) as ArrayRef;

    let schema = Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("day", DataType::Int32, false),
        Field::new("hour", DataType::Int32, false),
        Field::new("PM2.5", DataType::Float64, true),
        Field::new("PM10", DataType::Float64, true),
        Field::new("CO", DataType::Float64, true),
        Field::new("O3", DataType::Float64, true),
        Field::new("TEMP", DataType::Float64, true),
        Field::new("PRES", DataType::Float64, true),
        Field::new("DEWP", DataType::Float64, true),
        Field::new("station", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            ints(&cols.year),
            ints(&cols.month),
            ints(&cols.day),
            ints(&cols.hour),
            floats(&cols.pm25),
            floats(&cols.pm10),
            floats(&cols.co),
            floats(&cols.o3),
            floats(&cols.temp),
            floats(&cols.pres),
            floats(&cols.dewp),
            Arc::new(StringArray::from(cols.station.clone())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(PARQUET_PATH).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
