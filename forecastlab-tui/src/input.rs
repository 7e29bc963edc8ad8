//! Input dispatch: overlays → global keys → focused-panel handlers; mouse by hit area.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use forecastlab_core::AreaSelector;

use crate::app::{AppState, Focus, Overlay};

/// Fraction of the visible window moved per pan key.
const PAN_STEP: f64 = 0.1;
const ZOOM_IN: f64 = 0.8;
const ZOOM_OUT: f64 = 1.25;
const PAGE: isize = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome | Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('r') => {
            app.reload();
            return;
        }
        KeyCode::Tab => {
            app.focus = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus.prev()
            } else {
                app.focus.next()
            };
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        _ => {}
    }

    // 3. Focused-panel keys.
    match app.focus {
        Focus::Areas => handle_areas_key(app, key),
        Focus::Chart => handle_chart_key(app, key),
        Focus::Data => handle_data_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_areas_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.update_selection(AreaSelector::select_next),
        KeyCode::Char('k') | KeyCode::Up => app.update_selection(AreaSelector::select_prev),
        KeyCode::Char('g') | KeyCode::Home => app.update_selection(AreaSelector::select_first),
        KeyCode::Char('G') | KeyCode::End => app.update_selection(AreaSelector::select_last),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.focus = Focus::Chart,
        _ => {}
    }
}

fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.viewport.pan_x(-PAN_STEP),
        KeyCode::Char('l') | KeyCode::Right => app.viewport.pan_x(PAN_STEP),
        KeyCode::Char('k') | KeyCode::Up => app.viewport.pan_y(PAN_STEP),
        KeyCode::Char('j') | KeyCode::Down => app.viewport.pan_y(-PAN_STEP),
        KeyCode::Char('+') | KeyCode::Char('=') => app.viewport.zoom(ZOOM_IN, None),
        KeyCode::Char('-') | KeyCode::Char('_') => app.viewport.zoom(ZOOM_OUT, None),
        KeyCode::Char('0') => app.viewport.reset(),
        KeyCode::Char(',') => app.step_hover(-1),
        KeyCode::Char('.') => app.step_hover(1),
        KeyCode::Esc => app.hover = None,
        _ => {}
    }
}

fn handle_data_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_table(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_table(-1),
        KeyCode::PageDown => app.scroll_table(PAGE),
        KeyCode::PageUp => app.scroll_table(-PAGE),
        KeyCode::Char('g') | KeyCode::Home => app.table_scroll = 0,
        KeyCode::Char('G') | KeyCode::End => app.scroll_table(isize::MAX),
        _ => {}
    }
}

/// Mouse over the chart: scroll zooms at the pointer, left-drag pans, motion hovers.
/// Clicking a panel focuses it; clicking an area name selects it.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    if app.overlay != Overlay::None {
        return;
    }
    let hit = app.hit_areas.get();
    let (col, row) = (mouse.column, mouse.row);

    if contains(hit.plot, col, row) {
        handle_plot_mouse(app, hit.plot, mouse);
        return;
    }

    match mouse.kind {
        MouseEventKind::Drag(MouseButton::Left) => {
            // Dragging off the plot keeps panning.
            if app.drag_from.is_some() {
                handle_plot_mouse(app, hit.plot, mouse);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.drag_from = None,
        MouseEventKind::Down(MouseButton::Left) if contains(hit.areas_list, col, row) => {
            app.focus = Focus::Areas;
            let index = hit.areas_offset + (row - hit.areas_list.y) as usize;
            let name = app
                .selector
                .as_ref()
                .and_then(|s| s.options().get(index))
                .cloned();
            if let Some(name) = name {
                app.restore_area(&name);
            }
        }
        MouseEventKind::Down(MouseButton::Left) if contains(hit.table, col, row) => {
            app.focus = Focus::Data;
        }
        MouseEventKind::ScrollDown if contains(hit.table, col, row) => app.scroll_table(1),
        MouseEventKind::ScrollUp if contains(hit.table, col, row) => app.scroll_table(-1),
        MouseEventKind::Moved => app.hover = None,
        _ => {}
    }
}

fn handle_plot_mouse(app: &mut AppState, plot: Rect, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            let anchor = app.viewport.data_at(plot, col, row);
            app.viewport.zoom(ZOOM_IN, anchor);
        }
        MouseEventKind::ScrollDown => {
            let anchor = app.viewport.data_at(plot, col, row);
            app.viewport.zoom(ZOOM_OUT, anchor);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            app.focus = Focus::Chart;
            app.drag_from = Some((col, row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some((from_col, from_row)) = app.drag_from {
                let (cw, ch) = app.viewport.cell_size(plot);
                let dx = (from_col as f64 - col as f64) * cw;
                let dy = (row as f64 - from_row as f64) * ch;
                app.viewport.pan_by(dx, dy);
                app.drag_from = Some((col, row));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.drag_from = None,
        MouseEventKind::Moved => {
            if let Some((x, _)) = app.viewport.data_at(plot, col, row) {
                app.hover_x(x);
            }
        }
        _ => {}
    }
}

fn contains(rect: Rect, col: u16, row: u16) -> bool {
    rect.contains(Position::new(col, row))
}
