//! Spreadsheet reader (first worksheet, first row is the header).

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::loader::LoadError;
use super::table::{Cell, RawTable};

/// File extensions read as spreadsheets instead of delimited text.
pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SPREADSHEET_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

pub fn read_spreadsheet(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Spreadsheet("workbook has no worksheets".into()))?
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(|c| convert(c).as_text()).collect(),
        None => Vec::new(),
    };
    let rows = rows.map(|r| r.iter().map(convert).collect()).collect();

    Ok(RawTable { headers, rows })
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Cell::Date(ndt.date()),
            None => Cell::Number(dt.as_f64()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn extension_dispatch() {
        assert!(is_spreadsheet(Path::new("Prophet_All_Areas_Forecast.xlsx")));
        assert!(is_spreadsheet(Path::new("book.XLS")));
        assert!(!is_spreadsheet(Path::new("forecast.csv")));
        assert!(!is_spreadsheet(Path::new("forecast")));
    }

    #[test]
    fn cells_convert_by_kind() {
        assert_eq!(convert(&Data::Empty), Cell::Empty);
        assert_eq!(convert(&Data::Float(45352.0)), Cell::Number(45352.0));
        assert_eq!(convert(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(convert(&Data::Bool(true)), Cell::Text("true".into()));

        let iso = convert(&Data::DateTimeIso("2024-03-01T00:00:00".into()));
        assert_eq!(iso.as_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(
            convert(&Data::Float(45352.0)).as_date(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn missing_workbook_is_a_spreadsheet_error() {
        let err = read_spreadsheet(Path::new("/nonexistent/forecast.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
    }
}
