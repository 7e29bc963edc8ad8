//! Record: one row of the forecast dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Series;

pub const AREA_COLUMN: &str = "Area";
pub const DATE_COLUMN: &str = "Date";
pub const LOWER_CI_COLUMN: &str = "Lower_95_CI";
pub const UPPER_CI_COLUMN: &str = "Upper_95_CI";

/// One (Area, Date) observation with its actual, fitted and forecast values.
///
/// Every numeric column is optional: an empty cell, a `NaN` marker or an
/// absent column all become `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub area: String,
    pub date: NaiveDate,
    pub actual: Option<f64>,
    pub prophet_train_fitted: Option<f64>,
    pub prophet_forecast: Option<f64>,
    pub auto_arima_forecast: Option<f64>,
    pub lower_95_ci: Option<f64>,
    pub upper_95_ci: Option<f64>,
}

impl Record {
    /// A record with only its keys set.
    pub fn new(area: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            area: area.into(),
            date,
            actual: None,
            prophet_train_fitted: None,
            prophet_forecast: None,
            auto_arima_forecast: None,
            lower_95_ci: None,
            upper_95_ci: None,
        }
    }

    pub fn value(&self, series: Series) -> Option<f64> {
        match series {
            Series::Actual => self.actual,
            Series::ProphetTrainFitted => self.prophet_train_fitted,
            Series::ProphetForecast => self.prophet_forecast,
            Series::AutoArimaForecast => self.auto_arima_forecast,
        }
    }

    pub fn set_value(&mut self, series: Series, value: Option<f64>) {
        match series {
            Series::Actual => self.actual = value,
            Series::ProphetTrainFitted => self.prophet_train_fitted = value,
            Series::ProphetForecast => self.prophet_forecast = value,
            Series::AutoArimaForecast => self.auto_arima_forecast = value,
        }
    }

    pub fn has_forecast(&self) -> bool {
        self.prophet_forecast.is_some()
    }
}
