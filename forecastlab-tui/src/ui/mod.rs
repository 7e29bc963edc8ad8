//! Top-level UI layout: area picker beside the chart and data preview, status bar below.

pub mod chart_panel;
pub mod overlays;
pub mod selector_panel;
pub mod status_bar;
pub mod table_panel;

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};
use ratatui::Frame;

use crate::app::{AppState, Overlay};

const SIDEBAR_WIDTH: u16 = 24;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let main_area = chunks[0];
    let status_area = chunks[1];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(main_area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Min(5)])
        .split(columns[1]);

    selector_panel::render(f, columns[0], app);
    chart_panel::render(f, right[0], app);
    table_panel::render(f, right[1], app);
    status_bar::render(f, status_area, app);

    // Draw overlays on top.
    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area),
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

/// A rect of the given percentage size, centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{app_with_csv, NORTH_SOUTH};
    use forecastlab_core::ViewerConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draws_selected_area_chart_and_table() {
        let (_dir, app) = app_with_csv(NORTH_SOUTH);
        let text = screen(&app);
        assert!(text.contains("Forecast Analysis for North"));
        assert!(text.contains("Select Area (2)"));
        assert!(text.contains("Prophet_Forecast"));
        assert!(text.contains("Raw Data (6 rows)"));
        assert!(text.contains("1,234.57"));

        let hit = app.hit_areas.get();
        assert!(hit.plot.width > 0 && hit.plot.height > 0);
        assert_eq!(hit.areas_list.x, 1);
    }

    #[test]
    fn hover_shows_tooltip_and_rule_text() {
        let (_dir, mut app) = app_with_csv(NORTH_SOUTH);
        app.step_hover(1);
        app.step_hover(2);
        let text = screen(&app);
        assert!(text.contains("Date: 2024-03-01"));
        assert!(text.contains("Forecast Start Date: 2024-03-01"));
        assert!(text.contains("Actual: 120.00"));
    }

    #[test]
    fn load_failure_renders_only_the_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = AppState::new(ViewerConfig::default(), dir.path().join("absent.xlsx"));
        app.load().unwrap();
        let text = screen(&app);
        assert!(text.contains("Could not load the file"));
        assert!(!text.contains("Forecast Analysis for"));
        assert_eq!(app.hit_areas.get().plot, Rect::default());
    }

    #[test]
    fn centered_rect_is_centered() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!((r.width, r.height), (50, 20));
        assert_eq!((r.x, r.y), (25, 10));
    }

    #[test]
    fn overlays_draw_on_top() {
        let (_dir, mut app) = app_with_csv(NORTH_SOUTH);
        app.overlay = Overlay::Help;
        assert!(screen(&app).contains("cycle focus"));
        app.overlay = Overlay::ErrorHistory;
        assert!(screen(&app).contains("No errors recorded."));
    }
}
