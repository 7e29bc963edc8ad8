//! Series: the four plotted value columns of a forecast dataset.

use serde::{Deserialize, Serialize};

/// One of the value columns that is melted into long form and drawn as a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Series {
    Actual,
    ProphetTrainFitted,
    ProphetForecast,
    AutoArimaForecast,
}

impl Series {
    /// All series in column order (the melt order).
    pub const ALL: [Series; 4] = [
        Series::Actual,
        Series::ProphetTrainFitted,
        Series::ProphetForecast,
        Series::AutoArimaForecast,
    ];

    /// Column name in the source file. Also the legend label.
    ///
    /// `Auto_arima_forcasted` is misspelled in the file format and must stay that way.
    pub fn column(self) -> &'static str {
        match self {
            Series::Actual => "Actual",
            Series::ProphetTrainFitted => "Prophet_Train_Fitted",
            Series::ProphetForecast => "Prophet_Forecast",
            Series::AutoArimaForecast => "Auto_arima_forcasted",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Series::ALL.into_iter().find(|s| s.column() == name)
    }

    /// Forecast series are drawn dashed.
    pub fn is_forecast(self) -> bool {
        matches!(self, Series::ProphetForecast | Series::AutoArimaForecast)
    }

    pub fn index(self) -> usize {
        match self {
            Series::Actual => 0,
            Series::ProphetTrainFitted => 1,
            Series::ProphetForecast => 2,
            Series::AutoArimaForecast => 3,
        }
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_match_file_format() {
        assert_eq!(Series::Actual.column(), "Actual");
        assert_eq!(Series::AutoArimaForecast.column(), "Auto_arima_forcasted");
        assert_eq!(
            Series::from_column("Prophet_Train_Fitted"),
            Some(Series::ProphetTrainFitted)
        );
        assert_eq!(Series::from_column("Auto_arima_forecasted"), None);
    }

    #[test]
    fn only_forecasts_are_dashed() {
        let dashed: Vec<Series> = Series::ALL.into_iter().filter(|s| s.is_forecast()).collect();
        assert_eq!(dashed, vec![Series::ProphetForecast, Series::AutoArimaForecast]);
    }

    #[test]
    fn index_follows_column_order() {
        for (i, s) in Series::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }
}
