//! CSV loader for sensor readings.
//!
//! Turns a PurpleAir-style CSV export into an ordered list of [`Record`]s.
//! Which columns hold the zip code, time bucket and concentration is
//! configurable; the defaults match the export layout (1, 4 and 5).

use crate::error::LoadError;
use crate::models::Record;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Options for reading a CSV file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether the first row is a header to skip.
    pub has_headers: bool,
    /// Zero-based column holding the zip code.
    pub zip_column: usize,
    /// Zero-based column holding the time-of-day bucket.
    pub time_column: usize,
    /// Zero-based column holding the concentration.
    pub concentration_column: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            zip_column: 1,
            time_column: 4,
            concentration_column: 5,
        }
    }
}

impl From<&crate::config::DataConfig> for LoadOptions {
    fn from(config: &crate::config::DataConfig) -> Self {
        Self {
            has_headers: config.has_headers,
            zip_column: config.zip_column,
            time_column: config.time_column,
            concentration_column: config.concentration_column,
        }
    }
}

/// Load all records from the CSV file at `path`.
pub fn load_records(path: &Path, options: &LoadOptions) -> Result<Vec<Record>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Reading readings from {}", path.display());
    read_records(file, options)
}

/// Read all records from any CSV source.
///
/// A row that is too short or has a bad concentration fails the whole read.
pub fn read_records<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<Record>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();

    for (i, result) in csv_reader.records().enumerate() {
        let row = i + 1;
        let fields = result?;

        let field = |column: usize| {
            fields
                .get(column)
                .ok_or(LoadError::MissingField { row, column })
        };

        let zip_code = field(options.zip_column)?;
        let time_bucket = field(options.time_column)?;
        let raw = field(options.concentration_column)?;

        records.push(Record::new(zip_code, time_bucket, parse_concentration(raw, row)?));
    }

    debug!(rows = records.len(), "CSV read complete");
    Ok(records)
}

fn parse_concentration(raw: &str, row: usize) -> Result<f64, LoadError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(LoadError::InvalidConcentration {
            row,
            value: raw.to_string(),
        }),
    }
}

/// The built-in demo dataset.
pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new("12345", "Morning", 1.1),
        Record::new("94022", "Morning", 2.2),
        Record::new("94040", "Morning", 3.0),
        Record::new("94022", "Midday", 1.0),
        Record::new("94040", "Morning", 1.0),
        Record::new("94022", "Evening", 3.2),
    ]
}
