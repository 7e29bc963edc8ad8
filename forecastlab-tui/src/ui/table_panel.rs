//! Raw-data preview of the selected area's rows, before reshaping.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;

use forecastlab_core::domain::{
    Record, Series, AREA_COLUMN, DATE_COLUMN, LOWER_CI_COLUMN, UPPER_CI_COLUMN,
};
use forecastlab_core::format::format_optional;

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Data;
    let rows = app.preview_rows();
    let total = app.page.as_ref().map_or(0, |p| p.view.rows.len());

    let title = if total > rows.len() {
        format!(" Raw Data (first {} of {total} rows) ", rows.len())
    } else {
        format!(" Raw Data ({total} rows) ")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(title)
        .title_style(theme::panel_title(focused));

    let mut hit = app.hit_areas.get();
    hit.table = block.inner(area);
    app.hit_areas.set(hit);

    if rows.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No rows to preview.", theme::muted())).block(block),
            area,
        );
        return;
    }

    let header = Row::new(header_names())
        .style(theme::accent().add_modifier(Modifier::BOLD));

    // Header takes one line of the inner height.
    let visible = block.inner(area).height.saturating_sub(1) as usize;
    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .skip(app.table_scroll)
        .take(visible)
        .map(|(i, record)| {
            let style = if focused && i == app.table_scroll {
                theme::cursor_row(true)
            } else {
                theme::text()
            };
            Row::new(record_cells(record)).style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(8),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Length(20),
        Constraint::Length(11),
        Constraint::Length(11),
    ];
    let table = Table::new(body, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn header_names() -> [&'static str; 8] {
    [
        AREA_COLUMN,
        DATE_COLUMN,
        Series::Actual.column(),
        Series::ProphetTrainFitted.column(),
        Series::ProphetForecast.column(),
        Series::AutoArimaForecast.column(),
        LOWER_CI_COLUMN,
        UPPER_CI_COLUMN,
    ]
}

/// Display cells in header order; missing values are blank.
fn record_cells(record: &Record) -> [String; 8] {
    [
        record.area.clone(),
        record.date.format("%Y-%m-%d").to_string(),
        format_optional(record.actual),
        format_optional(record.prophet_train_fitted),
        format_optional(record.prophet_forecast),
        format_optional(record.auto_arima_forecast),
        format_optional(record.lower_95_ci),
        format_optional(record.upper_95_ci),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn missing_values_render_blank() {
        let mut r = Record::new("North", NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        r.prophet_forecast = Some(1234.567);
        let cells = record_cells(&r);
        assert_eq!(cells[1], "2024-04-01");
        assert_eq!(cells[2], "");
        assert_eq!(cells[4], "1,234.57");
    }

    #[test]
    fn header_matches_file_columns() {
        assert_eq!(header_names()[5], "Auto_arima_forcasted");
        assert_eq!(header_names()[6], "Lower_95_CI");
    }
}
