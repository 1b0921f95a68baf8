//! Error types for the aggregation engine and the CSV loader.
//!
//! The application shell wraps these in `anyhow::Error`; the interactive
//! session prints them and keeps running.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`crate::analysis::Aggregator`].
#[derive(Debug, Error, PartialEq)]
pub enum AggregatorError {
    /// `load` was given zero data rows.
    #[error("the input contains no data rows")]
    EmptyInput,

    /// `toggle` was given a zip code that is not in the dataset.
    #[error("unknown zip code: {0}")]
    UnknownZipCode(String),

    /// A query ran before any dataset was loaded.
    #[error("no dataset has been loaded")]
    NoDatasetLoaded,

    /// No record matches the requested (zip code, time bucket) pair.
    #[error("no readings for zip code {zip_code} at {time_bucket}")]
    NoMatchingRecords {
        zip_code: String,
        time_bucket: String,
    },
}

/// Errors raised while turning a CSV file into records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Row numbers are 1-based data rows (the header is not counted).
    #[error("row {row}: missing field in column {column}")]
    MissingField { row: usize, column: usize },

    #[error("row {row}: '{value}' is not a valid concentration")]
    InvalidConcentration { row: usize, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AggregatorError::UnknownZipCode("99999".to_string()).to_string(),
            "unknown zip code: 99999"
        );
        assert_eq!(
            AggregatorError::NoMatchingRecords {
                zip_code: "94022".to_string(),
                time_bucket: "Night".to_string(),
            }
            .to_string(),
            "no readings for zip code 94022 at Night"
        );
        assert_eq!(
            LoadError::MissingField { row: 3, column: 5 }.to_string(),
            "row 3: missing field in column 5"
        );
    }
}
