//! Test helpers for building an app over a small on-disk dataset

use std::path::PathBuf;

use forecastlab_core::ViewerConfig;
use tempfile::TempDir;

use crate::app::AppState;

/// North: Jan–Mar actuals, Apr–Jun forecasts. South: Jan–Feb actuals only.
pub const NORTH_SOUTH: &str = "\
Area,Date,Actual,Prophet_Train_Fitted,Prophet_Forecast,Auto_arima_forcasted,Lower_95_CI,Upper_95_CI
North,2024-01-01,100,98,,,,
North,2024-02-01,110,108,,,,
North,2024-03-01,120,118,,,,
North,2024-04-01,,,125,124,115,135
North,2024-05-01,,,130,131,118,142
North,2024-06-01,,,1234.567,137,120,150
South,2024-01-01,50,49,,,,
South,2024-02-01,55,54,,,,
";

/// Write `csv` to a temp dir and load it into a fresh app.
pub fn app_with_csv(csv: &str) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("forecast.csv");
    std::fs::write(&path, csv).unwrap();
    let mut app = AppState::new(ViewerConfig::default(), path);
    app.load().unwrap();
    (dir, app)
}
