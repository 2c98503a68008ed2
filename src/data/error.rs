use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to read '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("Failed to parse CSV data")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON data")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read Parquet data")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Failed to decode Arrow record batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    #[error("Column '{column}' has unsupported type {data_type}")]
    ColumnType { column: String, data_type: String },

    #[error("Row {row}: '{column}' is null")]
    NullValue { row: usize, column: String },

    #[error("Row {row}: {year}-{month:02}-{day:02} {hour:02}:00 is not a valid date")]
    InvalidDate {
        row: usize,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },
}
