//! Bottom status bar: focus, key hints, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Focus, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(format!(" [{}] ", app.focus.label()), theme::accent_bold()));
    let hints = match app.focus {
        Focus::Areas => "j/k:area",
        Focus::Chart => "h/l/j/k:pan +/-:zoom 0:reset ,/.:hover",
        Focus::Data => "j/k:scroll PgUp/PgDn",
    };
    spans.push(Span::styled(
        format!("{hints} Tab:focus ?:help e:errors r:reload q:quit"),
        theme::muted(),
    ));

    if app.page.is_some() && !app.viewport.is_home() {
        spans.push(Span::styled(" [zoomed, 0:reset]", theme::warning()));
    }

    if !app.error_history.is_empty() {
        spans.push(Span::styled(
            format!(" [{} err]", app.error_history.len()),
            theme::negative(),
        ));
    }

    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
