//! Raw header + cell grid shared by the CSV and spreadsheet readers.

use chrono::NaiveDate;

use super::dates::{excel_serial_to_date, parse_date};

/// Tokens read as a missing numeric value.
const MISSING_MARKERS: [&str; 7] = ["", "nan", "na", "n/a", "null", "none", "#n/a"];

/// One cell as read from the source file, before typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

/// Result of reading a numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    Value(f64),
    Missing,
    /// Present but not a number; treated as missing by the loader.
    Invalid,
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form of the cell, used for the Area column.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.to_string(),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => parse_date(s),
            Cell::Number(n) => excel_serial_to_date(*n),
            Cell::Date(d) => Some(*d),
        }
    }

    pub fn as_number(&self) -> NumericCell {
        match self {
            Cell::Empty => NumericCell::Missing,
            Cell::Number(n) if n.is_nan() => NumericCell::Missing,
            Cell::Number(n) => NumericCell::Value(*n),
            Cell::Date(_) => NumericCell::Invalid,
            Cell::Text(s) => {
                let t = s.trim();
                if MISSING_MARKERS.iter().any(|m| t.eq_ignore_ascii_case(m)) {
                    return NumericCell::Missing;
                }
                match t.parse::<f64>() {
                    Ok(v) if v.is_nan() => NumericCell::Missing,
                    Ok(v) => NumericCell::Value(v),
                    Err(_) => NumericCell::Invalid,
                }
            }
        }
    }
}

/// A header row plus data rows. Rows may be shorter than the header.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Index of a column by its trimmed header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}
