//! ForecastLab CLI: quick looks at forecast files without the TUI.
//!
//! Commands:
//! - `areas`: list the distinct areas of a file
//! - `inspect`: summarize one area: rows, forecast start, band, series coverage
//! - `sample`: write a synthetic forecast CSV

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use forecastlab_core::data::{generate, write_dataset_csv, CachedLoad, DatasetCache, SampleSpec};
use forecastlab_core::domain::Series;
use forecastlab_core::format::format_value;
use forecastlab_core::{AreaSelector, AreaView};

#[derive(Parser)]
#[command(
    name = "forecastlab",
    about = "ForecastLab CLI: inspect per-area forecast files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sorted distinct areas.
    Areas {
        /// Forecast file (.xlsx or .csv).
        path: PathBuf,
    },
    /// Summarize one area of a forecast file.
    Inspect {
        /// Forecast file (.xlsx or .csv).
        path: PathBuf,

        /// Area to inspect. Defaults to the first area.
        #[arg(long)]
        area: Option<String>,
    },
    /// Write a synthetic forecast dataset as CSV.
    Sample {
        /// Output file.
        path: PathBuf,

        #[arg(long, default_value_t = 4)]
        areas: usize,

        /// Months per area, history plus horizon.
        #[arg(long, default_value_t = 36)]
        months: usize,

        /// Trailing months that carry forecasts.
        #[arg(long, default_value_t = 6)]
        horizon: usize,

        /// First month (YYYY-MM-DD).
        #[arg(long, default_value = "2021-01-01")]
        start: String,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Areas { path } => {
            let loaded = load(&path)?;
            print!("{}", areas_report(&loaded));
            Ok(())
        }
        Commands::Inspect { path, area } => {
            let loaded = load(&path)?;
            print!("{}", inspect_report(&loaded, area.as_deref())?);
            Ok(())
        }
        Commands::Sample {
            path,
            areas,
            months,
            horizon,
            start,
            seed,
        } => {
            let start = NaiveDate::parse_from_str(&start, "%Y-%m-%d")
                .with_context(|| format!("invalid --start {start:?}"))?;
            let spec = SampleSpec {
                areas,
                months,
                horizon,
                start,
                seed,
            };
            run_sample(&path, &spec)
        }
    }
}

/// Load through the cache; a recoverable failure is still an error here.
fn load(path: &Path) -> Result<Arc<CachedLoad>> {
    let mut cache = DatasetCache::new();
    let entry = cache
        .get_or_load(path)
        .with_context(|| format!("loading {}", path.display()))?;
    if let Some(message) = &entry.error {
        bail!("{message}");
    }
    Ok(entry)
}

fn areas_report(loaded: &CachedLoad) -> String {
    let areas = loaded.dataset.areas();
    if areas.is_empty() {
        return "No areas found in the dataset.\n".to_string();
    }
    areas.iter().map(|a| format!("{a}\n")).collect()
}

fn inspect_report(loaded: &CachedLoad, area: Option<&str>) -> Result<String> {
    let Some(mut selector) = AreaSelector::new(&loaded.dataset) else {
        bail!("No areas found in the dataset.");
    };
    if let Some(name) = area {
        if selector.selected() != name && !selector.select_by_name(name) {
            bail!("unknown area {name:?}; try `forecastlab areas`");
        }
    }

    let view = AreaView::build(&loaded.dataset, selector.selected());
    let mut out = String::new();
    out.push_str(&format!("Area:           {}\n", view.area));
    out.push_str(&format!("Rows:           {}\n", view.rows.len()));
    if let (Some(first), Some(last)) = (
        view.rows.iter().map(|r| r.date).min(),
        view.rows.iter().map(|r| r.date).max(),
    ) {
        out.push_str(&format!("Dates:          {first} .. {last}\n"));
    }
    match view.forecast_start {
        Some(date) => out.push_str(&format!("Forecast start: {date}\n")),
        None => out.push_str("Forecast start: none\n"),
    }
    out.push_str(&band_line(&view));
    out.push_str("Series present:\n");
    for series in Series::ALL {
        let present = view.rows.iter().filter(|r| r.value(series).is_some()).count();
        out.push_str(&format!("  {:<22}{present}\n", series.column()));
    }
    Ok(out)
}

fn band_line(view: &AreaView) -> String {
    let dates = view.band.iter().map(|r| r.date);
    let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) else {
        return "Band:           none\n".to_string();
    };
    let lower = view
        .band
        .iter()
        .filter_map(|r| r.lower_95_ci)
        .fold(f64::INFINITY, f64::min);
    let upper = view
        .band
        .iter()
        .filter_map(|r| r.upper_95_ci)
        .fold(f64::NEG_INFINITY, f64::max);
    if lower.is_finite() && upper.is_finite() {
        format!(
            "Band:           {first} .. {last}, {} .. {}\n",
            format_value(lower),
            format_value(upper)
        )
    } else {
        format!("Band:           {first} .. {last}, no bounds\n")
    }
}

fn run_sample(path: &Path, spec: &SampleSpec) -> Result<()> {
    if spec.areas == 0 || spec.months == 0 {
        bail!("--areas and --months must be at least 1");
    }
    let dataset = generate(spec);
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_dataset_csv(&dataset, BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))?;
    println!(
        "Wrote {} rows for {} areas to {}",
        dataset.len(),
        dataset.areas().len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Area,Date,Actual,Prophet_Train_Fitted,Prophet_Forecast,Auto_arima_forcasted,Lower_95_CI,Upper_95_CI
North,2024-01-01,100,98,,,,
North,2024-02-01,110,109,,,,
North,2024-03-01,120,118,,,,
North,2024-04-01,,,130,128,120,140
North,2024-05-01,,,135,133,122,148
South,2024-01-01,50,49,,,,
";

    fn write_csv(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn areas_are_sorted_one_per_line() {
        let (_dir, path) = write_csv(CSV);
        let loaded = load(&path).unwrap();
        assert_eq!(areas_report(&loaded), "North\nSouth\n");
    }

    #[test]
    fn inspect_defaults_to_first_area() {
        let (_dir, path) = write_csv(CSV);
        let report = inspect_report(&load(&path).unwrap(), None).unwrap();
        assert!(report.contains("Area:           North"));
        assert!(report.contains("Rows:           5"));
        assert!(report.contains("Forecast start: 2024-03-01"));
        assert!(report.contains("Band:           2024-04-01 .. 2024-05-01, 120.00 .. 148.00"));
        assert!(report.contains("  Prophet_Forecast      2"));
    }

    #[test]
    fn inspect_area_without_forecast() {
        let (_dir, path) = write_csv(CSV);
        let report = inspect_report(&load(&path).unwrap(), Some("South")).unwrap();
        assert!(report.contains("Forecast start: none"));
        assert!(report.contains("Band:           none"));
    }

    #[test]
    fn inspect_unknown_area_is_an_error() {
        let (_dir, path) = write_csv(CSV);
        let err = inspect_report(&load(&path).unwrap(), Some("Nowhere")).unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn recoverable_load_failure_is_an_error() {
        let (_dir, path) = write_csv("Region,Date\nNorth,2024-01-01\n");
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("Could not load the file"));
    }

    #[test]
    fn fatal_load_failure_carries_context() {
        let (_dir, path) = write_csv(
            "Area,Date,Actual,Prophet_Train_Fitted,Prophet_Forecast,Auto_arima_forcasted,Lower_95_CI,Upper_95_CI\n\
             North,someday,1,,,,,\n",
        );
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("malformed date"));
    }

    #[test]
    fn sample_writes_a_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        let spec = SampleSpec {
            areas: 2,
            months: 12,
            ..SampleSpec::default()
        };
        run_sample(&path, &spec).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.dataset.len(), 24);
        assert_eq!(loaded.dataset.areas().len(), 2);
    }

    #[test]
    fn sample_rejects_empty_shape() {
        let dir = tempfile::tempdir().unwrap();
        let spec = SampleSpec {
            areas: 0,
            ..SampleSpec::default()
        };
        assert!(run_sample(&dir.path().join("x.csv"), &spec).is_err());
    }
}
