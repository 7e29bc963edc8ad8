//! Chart panel: band, series lines and forecast-start rule on a braille canvas.
//!
//! Layers are painted in the chart's z order, each on its own canvas layer so
//! later layers cover earlier ones. Axes and labels are written straight into
//! the buffer.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use ratatui::Frame;

use forecastlab_core::chart::{
    x_to_date, BandLayer, ChartSpec, HoverInfo, LayerKind, LineLayer, RuleLayer, StrokeDash,
};
use forecastlab_core::domain::Series;
use forecastlab_core::format::format_value;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::viewport::Viewport;

/// Braille dots per terminal cell.
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Chart;
    let title = match &app.page {
        Some(page) => format!(" {} ", page.chart.title),
        None => " Chart ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(title)
        .title_style(theme::panel_title(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(page) = &app.page else {
        render_empty(f, inner, app);
        return;
    };

    let hover = app.hover_info();
    let chart = ForecastChart {
        spec: &page.chart,
        viewport: &app.viewport,
        hover: hover.as_ref(),
    };
    let plot = chart.plot_area(inner);
    let mut hit = app.hit_areas.get();
    hit.plot = plot;
    app.hit_areas.set(hit);
    f.render_widget(chart, inner);

    if let Some(info) = &hover {
        render_tooltip(f, plot, &app.viewport, info, line_colors(&page.chart));
    }
}

fn render_empty(f: &mut Frame, area: Rect, app: &AppState) {
    let mut hit = app.hit_areas.get();
    hit.plot = Rect::default();
    app.hit_areas.set(hit);

    let message = match app.source.as_ref().and_then(|s| s.error.as_deref()) {
        Some(error) => Span::styled(error.to_string(), theme::negative()),
        None if app.source.is_some() => {
            Span::styled("No areas found in the dataset.", theme::warning())
        }
        None => Span::styled("No dataset loaded.", theme::muted()),
    };
    let lines = vec![Line::from(""), Line::from(message)];
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        area,
    );
}

/// Series colors, for tooltip rows.
fn line_colors(spec: &ChartSpec) -> Vec<(Series, Color)> {
    spec.layers
        .iter()
        .filter_map(|l| match &l.kind {
            LayerKind::Line(line) => Some((line.series, theme::rgb(line.color))),
            _ => None,
        })
        .collect()
}

/// The chart body: legend row, Y labels, plot, X labels.
struct ForecastChart<'a> {
    spec: &'a ChartSpec,
    viewport: &'a Viewport,
    hover: Option<&'a HoverInfo>,
}

impl ForecastChart<'_> {
    fn y_labels(&self) -> [String; 3] {
        let y = self.viewport.y;
        [
            format_value(y.max),
            format_value((y.min + y.max) / 2.0),
            format_value(y.min),
        ]
    }

    fn label_width(&self, inner: Rect) -> u16 {
        let widest = self.y_labels().iter().map(|l| l.len()).max().unwrap_or(0) as u16 + 1;
        widest.min(inner.width / 3)
    }

    /// Plot rectangle inside `inner`: one legend row on top, one label row below.
    fn plot_area(&self, inner: Rect) -> Rect {
        let lw = self.label_width(inner);
        Rect {
            x: inner.x + lw,
            y: inner.y + 1,
            width: inner.width.saturating_sub(lw),
            height: inner.height.saturating_sub(2),
        }
    }

    fn render_legend(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for layer in &self.spec.layers {
            let (glyph, label, style) = match &layer.kind {
                LayerKind::Band(b) => (
                    "█",
                    "95% CI".to_string(),
                    Style::default().fg(theme::blended(b.color, b.opacity)),
                ),
                LayerKind::Line(l) => (
                    match l.stroke {
                        StrokeDash::Solid => "━",
                        StrokeDash::Dashed { .. } => "┅",
                    },
                    l.series.column().to_string(),
                    Style::default().fg(theme::rgb(l.color)),
                ),
                LayerKind::Rule(r) => (
                    "│",
                    "Forecast start".to_string(),
                    Style::default().fg(theme::blended(r.color, r.opacity)),
                ),
            };
            spans.push(Span::styled(format!("{glyph} "), style));
            spans.push(Span::styled(format!("{label}  "), theme::muted()));
        }
        Line::from(spans).render(area, buf);
    }

    fn render_axes(&self, inner: Rect, plot: Rect, buf: &mut Buffer) {
        let label_style = theme::muted();
        let labels = self.y_labels();
        let rows = [plot.y, plot.y + plot.height / 2, plot.bottom().saturating_sub(1)];
        let w = self.label_width(inner).saturating_sub(1) as usize;
        for (label, y) in labels.iter().zip(rows) {
            let text = format!("{label:>w$}");
            let clipped: String = text.chars().take(w).collect();
            buf.set_string(inner.x, y, clipped, label_style);
        }

        let x_row = plot.bottom();
        if x_row >= inner.bottom() {
            return;
        }
        let x = self.viewport.x;
        let dates = [x.min, (x.min + x.max) / 2.0, x.max].map(|v| {
            x_to_date(v)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        });
        let [left, mid, right] = dates;
        buf.set_string(plot.x, x_row, &left, label_style);
        let mid_x = (plot.x + plot.width / 2).saturating_sub(mid.len() as u16 / 2);
        if mid_x > plot.x + left.len() as u16 {
            buf.set_string(mid_x, x_row, &mid, label_style);
        }
        let right_x = plot.right().saturating_sub(right.len() as u16);
        if right_x > mid_x + mid.len() as u16 {
            buf.set_string(right_x, x_row, &right, label_style);
        }
    }
}

impl Widget for ForecastChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let plot = self.plot_area(area);
        if plot.width == 0 || plot.height == 0 {
            return;
        }
        self.render_legend(Rect { height: 1, ..area }, buf);
        self.render_axes(area, plot, buf);

        let vp = *self.viewport;
        let spec = self.spec;
        let hover_x = self.hover.map(|h| h.x);
        let dot = (
            vp.x.span() / (plot.width as f64 * DOTS_X),
            vp.y.span() / (plot.height as f64 * DOTS_Y),
        );

        Canvas::default()
            .background_color(theme::background())
            .marker(Marker::Braille)
            .x_bounds([vp.x.min, vp.x.max])
            .y_bounds([vp.y.min, vp.y.max])
            .paint(|ctx| {
                for layer in &spec.layers {
                    match &layer.kind {
                        LayerKind::Band(band) => paint_band(ctx, band, &vp, dot.0),
                        LayerKind::Line(line) => paint_line(ctx, line, dot),
                        LayerKind::Rule(rule) => paint_rule(ctx, rule, &vp, dot.0),
                    }
                    ctx.layer();
                }
                if let Some(x) = hover_x {
                    ctx.draw(&CanvasLine::new(x, vp.y.min, x, vp.y.max, theme::MUTED));
                }
            })
            .render(plot, buf);
    }
}

/// Fill between the bounds with one vertical stroke per braille column.
fn paint_band(ctx: &mut Context, band: &BandLayer, vp: &Viewport, step: f64) {
    let color = theme::blended(band.color, band.opacity);
    if let [only] = band.points.as_slice() {
        ctx.draw(&CanvasLine::new(only.x, only.lower, only.x, only.upper, color));
        return;
    }
    for pair in band.points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let span = b.x - a.x;
        if span <= 0.0 {
            continue;
        }
        let start = a.x.max(vp.x.min);
        let end = b.x.min(vp.x.max);
        let mut x = start;
        while x <= end {
            let t = (x - a.x) / span;
            let lower = a.lower + (b.lower - a.lower) * t;
            let upper = a.upper + (b.upper - a.upper) * t;
            ctx.draw(&CanvasLine::new(x, lower, x, upper, color));
            x += step;
        }
    }
}

fn paint_line(ctx: &mut Context, line: &LineLayer, dot: (f64, f64)) {
    let color = theme::rgb(line.color);
    for segment in &line.segments {
        match line.stroke {
            StrokeDash::Solid => {
                if let [(x, y)] = segment.as_slice() {
                    ctx.draw(&CanvasLine::new(*x, *y, *x, *y, color));
                }
                for pair in segment.windows(2) {
                    let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
                }
            }
            StrokeDash::Dashed { on, off } => {
                let scale = (1.0 / dot.0, 1.0 / dot.1);
                for [(x1, y1), (x2, y2)] in dash_pieces(segment, scale, on as f64, off as f64) {
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
                }
            }
        }
    }
}

/// Vertical rule spanning the visible Y range, `width` braille columns wide.
fn paint_rule(ctx: &mut Context, rule: &RuleLayer, vp: &Viewport, step: f64) {
    let color = theme::blended(rule.color, rule.opacity);
    for i in 0..rule.width.max(1) {
        let x = rule.x + step * i as f64;
        ctx.draw(&CanvasLine::new(x, vp.y.min, x, vp.y.max, color));
    }
}

/// Cut a polyline into the "on" pieces of a dash pattern.
///
/// `scale` converts data units to pattern units per axis, so dashes keep the
/// same on-screen length at any zoom. The pattern phase carries across vertices.
pub(crate) fn dash_pieces(
    points: &[(f64, f64)],
    scale: (f64, f64),
    on: f64,
    off: f64,
) -> Vec<[(f64, f64); 2]> {
    let mut pieces = Vec::new();
    if on <= 0.0 {
        return pieces;
    }
    if off <= 0.0 {
        return points.windows(2).map(|p| [p[0], p[1]]).collect();
    }
    let period = on + off;
    let mut phase = 0.0_f64;

    for pair in points.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
        let len = ((x2 - x1) * scale.0).hypot((y2 - y1) * scale.1);
        if !len.is_finite() || len <= 0.0 {
            continue;
        }
        let at = |t: f64| (x1 + (x2 - x1) * t / len, y1 + (y2 - y1) * t / len);
        let mut t = 0.0;
        while t < len {
            let drawing = phase < on;
            let remaining = if drawing { on - phase } else { period - phase };
            let step = remaining.min(len - t);
            if drawing {
                pieces.push([at(t), at(t + step)]);
            }
            t += step;
            phase += step;
            if phase >= period - 1e-9 {
                phase = 0.0;
            }
        }
    }
    pieces
}

/// Tooltip box in the plot corner away from the hovered date.
fn render_tooltip(
    f: &mut Frame,
    plot: Rect,
    vp: &Viewport,
    info: &HoverInfo,
    colors: Vec<(Series, Color)>,
) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Date: ", theme::muted()),
        Span::styled(info.date.format("%Y-%m-%d").to_string(), theme::text()),
    ])];
    for tip in &info.tooltips {
        let color = colors
            .iter()
            .find(|(s, _)| *s == tip.series)
            .map(|(_, c)| *c)
            .unwrap_or(theme::TEXT);
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", tip.series), Style::default().fg(color)),
            Span::styled(tip.formatted_value(), theme::text()),
        ]));
    }
    if let Some(rule) = &info.rule {
        lines.push(Line::from(Span::styled(
            rule.clone(),
            theme::negative().add_modifier(Modifier::BOLD),
        )));
    }

    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 2;
    let height = lines.len() as u16 + 2;
    if width > plot.width || height > plot.height {
        return;
    }
    let midpoint = (vp.x.min + vp.x.max) / 2.0;
    let x = if info.x > midpoint {
        plot.x
    } else {
        plot.right() - width
    };
    let popup = Rect::new(x, plot.y, width, height);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted()),
        ),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashes_alternate_along_a_line() {
        let pieces = dash_pieces(&[(0.0, 0.0), (20.0, 0.0)], (1.0, 1.0), 5.0, 5.0);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], [(0.0, 0.0), (5.0, 0.0)]);
        assert_eq!(pieces[1], [(10.0, 0.0), (15.0, 0.0)]);
    }

    #[test]
    fn dash_phase_carries_across_vertices() {
        let pieces = dash_pieces(
            &[(0.0, 0.0), (3.0, 0.0), (3.0, 10.0)],
            (1.0, 1.0),
            5.0,
            5.0,
        );
        // 3 units on the first leg, 2 more on the second, a 5-unit gap, then 3 to the end.
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0], [(0.0, 0.0), (3.0, 0.0)]);
        assert_eq!(pieces[1], [(3.0, 0.0), (3.0, 2.0)]);
        assert_eq!(pieces[2], [(3.0, 7.0), (3.0, 10.0)]);
    }

    #[test]
    fn scale_sets_dash_length_in_screen_units() {
        // Two pattern units per data unit: a 5-on dash spans 2.5 data units.
        let pieces = dash_pieces(&[(0.0, 0.0), (10.0, 0.0)], (2.0, 2.0), 5.0, 5.0);
        assert_eq!(pieces[0], [(0.0, 0.0), (2.5, 0.0)]);
        assert_eq!(pieces.len(), 2);
    }

    #[test]
    fn zero_gap_is_solid() {
        let pts = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)];
        assert_eq!(dash_pieces(&pts, (1.0, 1.0), 5.0, 0.0).len(), 2);
        assert!(dash_pieces(&pts, (1.0, 1.0), 0.0, 5.0).is_empty());
    }
}
