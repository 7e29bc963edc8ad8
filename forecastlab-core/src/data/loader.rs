//! Forecast file loading.
//!
//! Resolution order:
//! 1. Spreadsheet extensions → first worksheet via calamine
//! 2. Anything else → delimited text, decoded as UTF-8 with a Latin-1 retry
//! 3. Header check (`Area`, `Date` required; value columns optional)
//! 4. Row typing: dates parsed, numeric cells read as `Option<f64>`
//!
//! A malformed date is fatal. Every other failure is recoverable: the caller
//! reports it and carries on with an empty dataset.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::decode::{decode_text, TextEncoding};
use super::spreadsheet::{is_spreadsheet, read_spreadsheet};
use super::table::{Cell, NumericCell, RawTable};
use crate::dataset::Dataset;
use crate::domain::{Record, Series, AREA_COLUMN, DATE_COLUMN, LOWER_CI_COLUMN, UPPER_CI_COLUMN};

static EMPTY_CELL: Cell = Cell::Empty;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse delimited text: {0}")]
    Csv(String),

    #[error("could not read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("missing required column '{0}' (check the file encoding and header row)")]
    MissingColumn(String),

    #[error("malformed date {value:?} in data row {row}")]
    MalformedDate { row: usize, value: String },
}

impl LoadError {
    /// Fatal errors end the program; the rest degrade to an empty dataset.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoadError::MalformedDate { .. })
    }
}

/// Source format a dataset was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited(TextEncoding),
    Spreadsheet,
}

impl SourceFormat {
    pub fn encoding(self) -> Option<TextEncoding> {
        match self {
            SourceFormat::Delimited(enc) => Some(enc),
            SourceFormat::Spreadsheet => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Delimited(enc) => write!(f, "csv ({enc})"),
            SourceFormat::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

/// A successfully loaded dataset plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub path: PathBuf,
    pub dataset: Dataset,
    pub format: SourceFormat,
    /// Numeric cells that were present but unparseable (read as missing).
    pub invalid_cells: usize,
}

/// Load a forecast dataset from disk.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let (table, format) = if is_spreadsheet(path) {
        (read_spreadsheet(path)?, SourceFormat::Spreadsheet)
    } else {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (text, encoding) = decode_text(&bytes);
        (parse_delimited(&text)?, SourceFormat::Delimited(encoding))
    };

    let (dataset, invalid_cells) = records_from_table(&table)?;

    let duplicates = dataset.duplicate_keys();
    if duplicates > 0 {
        tracing::warn!(duplicates, "dataset has repeated (Area, Date) pairs");
    }
    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        areas = dataset.areas().len(),
        source_format = %format,
        "dataset loaded"
    );

    Ok(LoadedDataset {
        path: path.to_path_buf(),
        dataset,
        format,
        invalid_cells,
    })
}

/// Parse comma-separated text with a header row.
pub fn parse_delimited(text: &str) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::Csv(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

/// Type the rows of a raw table. Returns the dataset and the count of invalid numeric cells.
pub fn records_from_table(table: &RawTable) -> Result<(Dataset, usize), LoadError> {
    let area_idx = table
        .column(AREA_COLUMN)
        .ok_or_else(|| LoadError::MissingColumn(AREA_COLUMN.into()))?;
    let date_idx = table
        .column(DATE_COLUMN)
        .ok_or_else(|| LoadError::MissingColumn(DATE_COLUMN.into()))?;

    let series_idx: Vec<(Series, Option<usize>)> = Series::ALL
        .into_iter()
        .map(|s| (s, table.column(s.column())))
        .collect();
    let lower_idx = table.column(LOWER_CI_COLUMN);
    let upper_idx = table.column(UPPER_CI_COLUMN);

    for (name, idx) in series_idx
        .iter()
        .map(|(s, i)| (s.column(), *i))
        .chain([(LOWER_CI_COLUMN, lower_idx), (UPPER_CI_COLUMN, upper_idx)])
    {
        if idx.is_none() {
            tracing::warn!(column = name, "column absent, values treated as missing");
        }
    }

    let mut invalid = 0usize;
    let mut blank_dates = 0usize;
    let mut blank_areas = 0usize;
    let mut records = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);
        let area_cell = cell(area_idx);
        let date_cell = cell(date_idx);

        // Trailing separator-only rows exported by spreadsheet tools.
        if area_cell.is_blank() && date_cell.is_blank() {
            continue;
        }
        // An empty Date is a missing date, not a malformed one.
        if date_cell.is_blank() {
            blank_dates += 1;
            continue;
        }
        if area_cell.is_blank() {
            blank_areas += 1;
            continue;
        }

        let date = date_cell.as_date().ok_or_else(|| LoadError::MalformedDate {
            row: i + 1,
            value: date_cell.as_text(),
        })?;

        let mut number = |idx: Option<usize>| match idx.map(cell) {
            None => None,
            Some(c) => match c.as_number() {
                NumericCell::Value(v) => Some(v),
                NumericCell::Missing => None,
                NumericCell::Invalid => {
                    invalid += 1;
                    None
                }
            },
        };

        let mut record = Record::new(area_cell.as_text(), date);
        for (series, idx) in &series_idx {
            let value = number(*idx);
            record.set_value(*series, value);
        }
        record.lower_95_ci = number(lower_idx);
        record.upper_95_ci = number(upper_idx);
        records.push(record);
    }

    if invalid > 0 {
        tracing::warn!(invalid, "non-numeric cells in value columns read as missing");
    }
    if blank_dates > 0 {
        tracing::warn!(rows = blank_dates, "rows without a Date skipped");
    }
    if blank_areas > 0 {
        tracing::warn!(rows = blank_areas, "rows without an Area skipped");
    }

    Ok((Dataset::new(records), invalid))
}
