//! Synthetic forecast datasets for demos and fixtures.
//!
//! Each area gets a monthly series: a history window with actuals and
//! in-sample fitted values, followed by a forecast horizon with both model
//! forecasts and a widening 95% band. Values are clearly fake but have the
//! shape of the real files (trend + seasonality + noise).

use std::io::Write;

use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::Dataset;
use crate::domain::{Record, Series, AREA_COLUMN, DATE_COLUMN, LOWER_CI_COLUMN, UPPER_CI_COLUMN};

const AREA_NAMES: [&str; 8] = [
    "North", "South", "East", "West", "Central", "Coastal", "Highlands", "Metro",
];

/// Shape of a generated dataset.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub areas: usize,
    /// Total months per area (history + horizon).
    pub months: usize,
    /// Trailing months that carry forecasts instead of actuals.
    pub horizon: usize,
    pub start: NaiveDate,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            areas: 4,
            months: 36,
            horizon: 6,
            start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            seed: 42,
        }
    }
}

/// Generate a dataset. The same spec always yields the same rows.
pub fn generate(spec: &SampleSpec) -> Dataset {
    let horizon = spec.horizon.min(spec.months);
    let history = spec.months - horizon;
    let mut records = Vec::with_capacity(spec.areas * spec.months);

    for a in 0..spec.areas {
        let area = area_name(a);
        let mut rng = StdRng::seed_from_u64(spec.seed.wrapping_add(a as u64));
        let base: f64 = rng.gen_range(500.0..5_000.0);
        let trend: f64 = rng.gen_range(-0.004..0.012) * base;
        let season: f64 = rng.gen_range(0.02..0.12) * base;
        let noise = 0.03 * base;

        for m in 0..spec.months {
            let Some(date) = spec.start.checked_add_months(Months::new(m as u32)) else {
                break;
            };
            let t = m as f64;
            let level = base + trend * t + season * (t * std::f64::consts::TAU / 12.0).sin();
            let mut rec = Record::new(area.clone(), date);

            if m < history {
                rec.actual = Some(round2(level + rng.gen_range(-noise..noise)));
                rec.prophet_train_fitted = Some(round2(level + rng.gen_range(-noise..noise) * 0.3));
            } else {
                let h = (m - history + 1) as f64;
                let forecast = level + rng.gen_range(-noise..noise) * 0.2;
                let spread = 1.96 * noise * h.sqrt();
                rec.prophet_forecast = Some(round2(forecast));
                rec.auto_arima_forecast = Some(round2(forecast + rng.gen_range(-noise..noise)));
                rec.lower_95_ci = Some(round2(forecast - spread));
                rec.upper_95_ci = Some(round2(forecast + spread));
            }
            records.push(rec);
        }
    }

    Dataset::new(records)
}

fn area_name(i: usize) -> String {
    match AREA_NAMES.get(i) {
        Some(name) => name.to_string(),
        None => format!("Area {:02}", i + 1),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Write a dataset in the forecast file layout (header + one line per record).
pub fn write_dataset_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![AREA_COLUMN, DATE_COLUMN];
    header.extend(Series::ALL.iter().map(|s| s.column()));
    header.extend([LOWER_CI_COLUMN, UPPER_CI_COLUMN]);
    wtr.write_record(&header)?;

    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for r in dataset.records() {
        let mut row = vec![r.area.clone(), r.date.to_string()];
        row.extend(Series::ALL.iter().map(|s| cell(r.value(*s))));
        row.push(cell(r.lower_95_ci));
        row.push(cell(r.upper_95_ci));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_delimited, records_from_table};

    #[test]
    fn deterministic_for_a_seed() {
        let spec = SampleSpec::default();
        assert_eq!(generate(&spec), generate(&spec));
        let other = SampleSpec { seed: 7, ..SampleSpec::default() };
        assert_ne!(generate(&spec), generate(&other));
    }

    #[test]
    fn history_then_horizon() {
        let spec = SampleSpec { areas: 1, months: 12, horizon: 3, ..SampleSpec::default() };
        let ds = generate(&spec);
        assert_eq!(ds.len(), 12);
        let recs = ds.records();
        assert!(recs[..9].iter().all(|r| r.actual.is_some() && r.prophet_forecast.is_none()));
        assert!(recs[9..].iter().all(|r| r.actual.is_none() && r.prophet_forecast.is_some()));
        assert!(recs[9..]
            .iter()
            .all(|r| r.lower_95_ci.unwrap() <= r.upper_95_ci.unwrap()));
    }

    #[test]
    fn many_areas_get_generated_names() {
        let spec = SampleSpec { areas: 10, months: 2, horizon: 1, ..SampleSpec::default() };
        let areas = generate(&spec).areas();
        assert_eq!(areas.len(), 10);
        assert!(areas.contains(&"Area 10".to_string()));
    }

    #[test]
    fn written_csv_reads_back() {
        let ds = generate(&SampleSpec { areas: 2, months: 6, horizon: 2, ..SampleSpec::default() });
        let mut buf = Vec::new();
        write_dataset_csv(&ds, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Area,Date,Actual,Prophet_Train_Fitted"));
        let (back, invalid) = records_from_table(&parse_delimited(&text).unwrap()).unwrap();
        assert_eq!(invalid, 0);
        assert_eq!(back, ds);
    }
}
