//! CSV readers for the cancer and risk-factor tables
//!
//! Cancer tables are exported with `;` separators and decimal commas, an
//! unnamed first column holding the year and a trailing empty column.
//! Risk-factor tables use `,` separators and a named `Jahr` column.

use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use super::error::DataError;
use crate::models::{SeriesTable, TimeSeries, YEAR_COLUMN};

/// Layout of a source table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    /// Field separator
    pub delimiter: u8,

    /// Values use `,` as decimal separator
    pub decimal_comma: bool,
}

impl TableFormat {
    /// `;`-separated with decimal commas (cancer registry exports)
    pub const CANCER: Self = Self {
        delimiter: b';',
        decimal_comma: true,
    };

    /// `,`-separated with decimal points (risk-factor tables)
    pub const RISK_FACTORS: Self = Self {
        delimiter: b',',
        decimal_comma: false,
    };
}

/// Check whether a header names a spreadsheet export artifact
///
/// Empty headers and pandas-style `Unnamed: N` placeholders carry no data.
fn is_artifact_header(header: &str) -> bool {
    static UNNAMED_RE: OnceLock<Regex> = OnceLock::new();

    let re = UNNAMED_RE
        .get_or_init(|| Regex::new(r"^Unnamed:\s*\d+$").expect("Invalid regex pattern"));

    let header = header.trim();
    header.is_empty() || re.is_match(header)
}

/// Parse a numeric cell, `None` for missing values
fn parse_number(raw: &str, decimal_comma: bool) -> Option<Result<f64, ()>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || matches!(trimmed, "NA" | "NaN" | "nan" | "-" | ".") {
        return None;
    }

    let normalized = if decimal_comma {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    Some(normalized.parse::<f64>().map_err(|_| ()))
}

fn parse_year(raw: &str, table: &str) -> Result<i32, DataError> {
    let trimmed = raw.trim();
    let invalid = || DataError::InvalidYear {
        table: table.to_string(),
        value: raw.to_string(),
    };

    if let Ok(year) = trimmed.parse::<i32>() {
        return Ok(year);
    }

    let value: f64 = trimmed.replace(',', ".").parse().map_err(|_| invalid())?;
    if value.fract() == 0.0 && value.abs() < f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(invalid())
    }
}

/// Read one table from any reader
///
/// The year column is the column named `Jahr`, or else the first column if
/// its header is empty or an `Unnamed` placeholder. Other artifact columns
/// are dropped, rows are sorted by year and missing cells are left out of
/// the resulting series.
pub fn read_table<R: Read>(reader: R, format: TableFormat, table: &str) -> Result<SeriesTable, DataError> {
    let csv_err = |source| DataError::Csv {
        table: table.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let year_idx = headers
        .iter()
        .position(|h| h == YEAR_COLUMN)
        .or_else(|| {
            headers
                .first()
                .filter(|h| is_artifact_header(h))
                .map(|_| 0)
        })
        .ok_or_else(|| DataError::MissingYearColumn(table.to_string()))?;

    let value_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, h)| *idx != year_idx && !is_artifact_header(h))
        .map(|(idx, h)| (idx, h.as_str()))
        .collect();

    let mut rows: Vec<(i32, Vec<f64>)> = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let year_cell = record.get(year_idx).unwrap_or_default();
        if year_cell.trim().is_empty() && record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let year = parse_year(year_cell, table)?;
        let mut values = Vec::with_capacity(value_columns.len());
        for (idx, column) in &value_columns {
            let cell = record.get(*idx).unwrap_or_default();
            let value = match parse_number(cell, format.decimal_comma) {
                None => f64::NAN,
                Some(Ok(v)) => v,
                Some(Err(())) => {
                    return Err(DataError::InvalidNumber {
                        table: table.to_string(),
                        column: (*column).to_string(),
                        year,
                        value: cell.to_string(),
                    })
                }
            };
            values.push(value);
        }
        rows.push((year, values));
    }

    if rows.is_empty() {
        return Err(DataError::EmptyTable(table.to_string()));
    }

    rows.sort_by_key(|(year, _)| *year);
    let years: Vec<i32> = rows.iter().map(|(year, _)| *year).collect();
    if let Some(w) = years.windows(2).find(|w| w[0] == w[1]) {
        return Err(DataError::UnorderedYears {
            column: YEAR_COLUMN.to_string(),
            previous: w[0],
            year: w[1],
        });
    }

    let columns = value_columns
        .iter()
        .enumerate()
        .map(|(col, (_, name))| {
            TimeSeries::new(*name, rows.iter().map(|(year, values)| (*year, values[col])))
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        table,
        rows = years.len(),
        columns = columns.len(),
        "Read table"
    );

    Ok(SeriesTable::new(years, columns))
}

/// Read one table from a file
pub fn load_table(path: &Path, format: TableFormat) -> Result<SeriesTable, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_table(file, format, &path.display().to_string())?;

    tracing::info!(
        path = %path.display(),
        variables = table.len(),
        years = table.years().len(),
        "Loaded table"
    );

    Ok(table)
}
