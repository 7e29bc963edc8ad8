//! Overlay widgets: welcome, key help, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 40, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Welcome to ForecastLab ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled(
            "  1. Pick an area in the left panel with j/k",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  2. Tab to the chart; pan with h/j/k/l, zoom with +/- or the mouse wheel",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  3. Hover with the mouse or , and . to read values",
            theme::muted(),
        )),
        Line::from(Span::styled("  4. Press ? for all keys", theme::muted())),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("Tab / Shift+Tab", "cycle focus: Areas, Chart, Data"),
            ("?", "this help"),
            ("e", "error history"),
            ("r", "reload the data file"),
            ("q", "quit"),
        ],
    ),
    (
        "Areas",
        &[("j/k ↑/↓", "select area"), ("g / G", "first / last"), ("Enter", "go to chart")],
    ),
    (
        "Chart",
        &[
            ("h/l ←/→", "pan dates"),
            ("j/k ↑/↓", "pan values"),
            ("+ / -", "zoom in / out"),
            ("0", "reset view"),
            (", / .", "hover previous / next date"),
            ("Esc", "clear hover"),
            ("mouse", "wheel zooms, drag pans, move to hover"),
        ],
    ),
    (
        "Data",
        &[("j/k ↑/↓", "scroll rows"), ("PgUp / PgDn", "page"), ("g / G", "top / bottom")],
    ),
];

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [any key] close ")
        .title_style(theme::accent_bold());

    let mut lines = Vec::new();
    for (section, keys) in HELP {
        lines.push(Line::from(Span::styled(*section, theme::accent_bold())));
        for (key, what) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<16}"), theme::warning()),
                Span::styled(*what, theme::text()),
            ]));
        }
        lines.push(Line::from(""));
    }

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().skip(app.error_scroll) {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
        if lines.len() >= inner.height as usize {
            break;
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
