//! ForecastLab TUI: area picker, layered forecast chart and raw-data preview.
//!
//! Panels:
//! 1. Areas: the distinct `Area` values, one selected at a time
//! 2. Chart: confidence band, four series lines and the forecast-start rule
//! 3. Data: the selected area's rows as they appear in the file

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod viewport;

#[cfg(test)]
mod test_helpers;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use forecastlab_core::{ConfigError, ViewerConfig};

use crate::app::{AppState, ErrorCategory};

const DEFAULT_LOG_FILTER: &str = "forecastlab_core=info,forecastlab_tui=info";

#[derive(Parser)]
#[command(
    name = "forecastlab-tui",
    about = "ForecastLab: interactive viewer for per-area forecast files"
)]
struct Args {
    /// Forecast file (.xlsx or .csv). Overrides `data_path` from the config.
    path: Option<PathBuf>,

    /// Config file.
    #[arg(long, default_value = ViewerConfig::FILE_NAME)]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_error) = match ViewerConfig::load(&args.config) {
        Ok(config) => (config, None),
        Err(e) => (ViewerConfig::default(), Some(e)),
    };
    init_logging(&config.log_dir)?;
    if let Some(e) = &config_error {
        tracing::warn!(path = %args.config.display(), error = %e, "config rejected, using defaults");
    }

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(info);
    }));

    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("forecastlab")
        .join("state.json");
    let persisted = persistence::load(&state_path);

    let data_path = args.path.unwrap_or_else(|| config.data_path.clone());
    let mut app = AppState::new(config, data_path);
    if let Some(e) = config_error {
        report_config_error(&mut app, &args.config, e);
    }

    // A fatal load error is reported before the terminal is taken over.
    app.load()
        .with_context(|| format!("loading {}", app.data_path.display()))?;
    persistence::apply(&mut app, persisted);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        tracing::warn!(path = %state_path.display(), error = %e, "could not save UI state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    match app.fatal.take() {
        Some(e) => Err(anyhow!(e).context(format!("reloading {}", app.data_path.display()))),
        None => Ok(()),
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms poll keeps the loop responsive without spinning.
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Route `tracing` output to `forecastlab.log`; the terminal belongs to the UI.
fn init_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("forecastlab.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn report_config_error(app: &mut AppState, path: &Path, error: ConfigError) {
    app.push_error(
        ErrorCategory::Config,
        format!("{error}; using defaults"),
        path.display().to_string(),
    );
}
