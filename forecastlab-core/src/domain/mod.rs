//! Domain types for ForecastLab

pub mod record;
pub mod series;

pub use record::{Record, AREA_COLUMN, DATE_COLUMN, LOWER_CI_COLUMN, UPPER_CI_COLUMN};
pub use series::Series;
