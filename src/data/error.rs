//! Error types for dataset loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the source tables
#[derive(Debug, Error)]
pub enum DataError {
    /// File could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV record
    #[error("CSV error in {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// No usable year column in the header
    #[error("Table {0} has no year column")]
    MissingYearColumn(String),

    /// Year cell is not an integer
    #[error("Invalid year '{value}' in table {table}")]
    InvalidYear { table: String, value: String },

    /// Value cell is not a number
    #[error("Invalid number '{value}' in table {table}, column '{column}', year {year}")]
    InvalidNumber {
        table: String,
        column: String,
        year: i32,
        value: String,
    },

    /// Years of a series are not strictly increasing
    #[error("Years of '{column}' are not strictly increasing: {year} follows {previous}")]
    UnorderedYears {
        column: String,
        previous: i32,
        year: i32,
    },

    /// Table without any data row
    #[error("Table {0} contains no data rows")]
    EmptyTable(String),
}

impl DataError {
    /// Get localized description for user-facing messages
    pub fn localized_desc(&self) -> String {
        let prefix = crate::i18n::t!("errors.data.error");
        format!("{prefix}: {self}")
    }
}
