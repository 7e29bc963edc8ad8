//! Theme tokens for the ForecastLab TUI.
//!
//! Chrome colors (borders, text, status levels) live here. Chart layer colors
//! come from the configured `ChartStyle` and are converted with [`rgb`].

use forecastlab_core::chart::Rgb;
use ratatui::style::{Color, Modifier, Style};

/// Chart background; layer opacities are blended against it.
pub const BACKGROUND: Rgb = Rgb::new(18, 18, 20);

pub const ACCENT: Color = Color::Rgb(0, 200, 220);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEGATIVE: Color = Color::Rgb(255, 70, 110);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(120, 130, 150);
pub const TEXT: Color = Color::White;

pub fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// A layer color composited over the chart background.
pub fn blended(c: Rgb, opacity: f64) -> Color {
    rgb(c.blend(BACKGROUND, opacity))
}

pub fn background() -> Color {
    rgb(BACKGROUND)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        muted()
    }
}

/// Highlighted row in lists and tables.
pub fn cursor_row(focused: bool) -> Style {
    let base = Style::default().add_modifier(Modifier::REVERSED);
    if focused {
        base.fg(ACCENT)
    } else {
        base.fg(MUTED)
    }
}
