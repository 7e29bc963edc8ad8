//! Per-area view: filter, forecast boundary, long-form reshape, band subset.
//!
//! Everything here is a pure function of the dataset and the selected area.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::domain::{Record, Series};

/// One (source row, series) observation of the melted table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub area: String,
    pub date: NaiveDate,
    pub lower_95_ci: Option<f64>,
    pub upper_95_ci: Option<f64>,
    pub series: Series,
    pub value: Option<f64>,
}

/// Everything the renderer needs for one selected area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaView {
    pub area: String,
    /// Filtered rows in file order (also the raw-data preview).
    pub rows: Vec<Record>,
    /// Last date before the first forecast value, if any.
    pub forecast_start: Option<NaiveDate>,
    /// Melted rows, series-major: `rows.len() * 4` entries.
    pub long_rows: Vec<LongRow>,
    /// Rows with a Prophet forecast; source of the confidence band.
    pub band: Vec<Record>,
}

impl AreaView {
    pub fn build(dataset: &Dataset, area: &str) -> Self {
        let rows: Vec<Record> = dataset.rows_for(area).cloned().collect();
        let forecast_start = forecast_start_date(&rows);
        let long_rows = melt(&rows);
        let band = confidence_band(&rows);

        tracing::debug!(
            area,
            rows = rows.len(),
            band = band.len(),
            forecast_start = ?forecast_start,
            "area view built"
        );

        Self {
            area: area.to_string(),
            rows,
            forecast_start,
            long_rows,
            band,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Long rows of one series, in row order.
    pub fn series_rows(&self, series: Series) -> impl Iterator<Item = &LongRow> + '_ {
        self.long_rows.iter().filter(move |r| r.series == series)
    }
}

/// The maximum date strictly before the earliest date with a Prophet forecast.
///
/// `None` when no row has a forecast, or when nothing precedes the first one.
pub fn forecast_start_date(rows: &[Record]) -> Option<NaiveDate> {
    let first_forecast = rows.iter().filter(|r| r.has_forecast()).map(|r| r.date).min()?;
    rows.iter()
        .map(|r| r.date)
        .filter(|d| *d < first_forecast)
        .max()
}

/// Reshape wide rows into one row per (row, series), carrying the CI bounds through.
pub fn melt(rows: &[Record]) -> Vec<LongRow> {
    Series::ALL
        .into_iter()
        .flat_map(move |series| {
            rows.iter().map(move |r| LongRow {
                area: r.area.clone(),
                date: r.date,
                lower_95_ci: r.lower_95_ci,
                upper_95_ci: r.upper_95_ci,
                series,
                value: r.value(series),
            })
        })
        .collect()
}

/// Rows where the Prophet forecast is present.
pub fn confidence_band(rows: &[Record]) -> Vec<Record> {
    rows.iter().filter(|r| r.has_forecast()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
    }

    fn row(area: &str, m: u32, actual: Option<f64>, forecast: Option<f64>) -> Record {
        let mut r = Record::new(area, d(m));
        r.actual = actual;
        r.prophet_forecast = forecast;
        if forecast.is_some() {
            r.lower_95_ci = Some(m as f64 - 1.0);
            r.upper_95_ci = Some(m as f64 + 1.0);
        }
        r
    }

    #[test]
    fn boundary_is_last_date_before_first_forecast() {
        let rows = vec![
            row("N", 1, Some(1.0), None),
            row("N", 3, Some(3.0), None),
            row("N", 2, Some(2.0), None),
            row("N", 5, None, Some(5.0)),
            row("N", 4, None, Some(4.0)),
        ];
        assert_eq!(forecast_start_date(&rows), Some(d(3)));
    }

    #[test]
    fn no_forecast_means_no_boundary() {
        let rows = vec![row("N", 1, Some(1.0), None), row("N", 2, Some(2.0), None)];
        assert_eq!(forecast_start_date(&rows), None);
    }

    #[test]
    fn forecast_on_first_date_means_no_boundary() {
        let rows = vec![row("N", 1, None, Some(1.0)), row("N", 2, None, Some(2.0))];
        assert_eq!(forecast_start_date(&rows), None);
    }

    #[test]
    fn melt_is_series_major_and_keeps_bounds() {
        let rows = vec![row("N", 1, Some(1.0), None), row("N", 2, None, Some(2.0))];
        let long = melt(&rows);
        assert_eq!(long.len(), 8);
        let order: Vec<(Series, NaiveDate)> = long.iter().map(|r| (r.series, r.date)).collect();
        assert_eq!(order[0], (Series::Actual, d(1)));
        assert_eq!(order[1], (Series::Actual, d(2)));
        assert_eq!(order[2], (Series::ProphetTrainFitted, d(1)));
        assert_eq!(order[7], (Series::AutoArimaForecast, d(2)));
        for lr in long.iter().filter(|r| r.date == d(2)) {
            assert_eq!(lr.lower_95_ci, Some(1.0));
            assert_eq!(lr.upper_95_ci, Some(3.0));
        }
        assert_eq!(long[5].value, Some(2.0)); // Prophet_Forecast, Feb
    }

    #[test]
    fn view_filters_to_the_area() {
        let ds = Dataset::new(vec![
            row("North", 1, Some(1.0), None),
            row("South", 1, Some(9.0), None),
            row("North", 2, None, Some(2.0)),
        ]);
        let view = AreaView::build(&ds, "North");
        assert_eq!(view.rows.len(), 2);
        assert!(view.rows.iter().all(|r| r.area == "North"));
        assert_eq!(view.band.len(), 1);
        assert_eq!(view.forecast_start, Some(d(1)));
        assert_eq!(view.series_rows(Series::Actual).count(), 2);
    }

    #[test]
    fn unknown_area_gives_an_empty_view() {
        let ds = Dataset::new(vec![row("North", 1, Some(1.0), None)]);
        let view = AreaView::build(&ds, "Nowhere");
        assert!(view.is_empty());
        assert!(view.long_rows.is_empty());
        assert!(view.band.is_empty());
        assert_eq!(view.forecast_start, None);
    }
}
