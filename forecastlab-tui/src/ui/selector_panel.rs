//! Area picker: one row per area, the selected one highlighted.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Areas;
    let count = app.selector.as_ref().map_or(0, |s| s.options().len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(format!(" Select Area ({count}) "))
        .title_style(theme::panel_title(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(selector) = &app.selector else {
        let mut hit = app.hit_areas.get();
        hit.areas_list = Rect::default();
        app.hit_areas.set(hit);
        f.render_widget(
            Paragraph::new(Span::styled("No areas", theme::muted())),
            inner,
        );
        return;
    };

    // Keep the selection visible; rows map 1:1 to options from `offset`.
    let height = inner.height as usize;
    let offset = if height == 0 {
        0
    } else {
        selector.index().saturating_sub(height - 1)
    };
    let mut hit = app.hit_areas.get();
    hit.areas_list = inner;
    hit.areas_offset = offset;
    app.hit_areas.set(hit);

    let lines: Vec<Line> = selector
        .options()
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, name)| {
            if i == selector.index() {
                Line::from(Span::styled(format!("▸ {name}"), theme::cursor_row(focused)))
            } else {
                Line::from(Span::styled(format!("  {name}"), theme::text()))
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}
