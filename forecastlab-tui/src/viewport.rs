//! Shared pan/zoom window over the chart's data space.
//!
//! Every layer is drawn through the same viewport, so panning or zooming
//! moves band, lines and rule together.

use forecastlab_core::chart::Domain;
use ratatui::layout::Rect;

/// Smallest visible span, as a fraction of the fitted span.
const MIN_ZOOM: f64 = 1e-3;
/// Largest visible span, as a multiple of the fitted span.
const MAX_ZOOM: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: Domain,
    pub y: Domain,
    home_x: Domain,
    home_y: Domain,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::fit(Domain::UNIT, Domain::UNIT)
    }
}

impl Viewport {
    /// A viewport showing exactly the given domains.
    pub fn fit(x: Domain, y: Domain) -> Self {
        Self {
            x,
            y,
            home_x: x,
            home_y: y,
        }
    }

    pub fn reset(&mut self) {
        self.x = self.home_x;
        self.y = self.home_y;
    }

    pub fn is_home(&self) -> bool {
        self.x == self.home_x && self.y == self.home_y
    }

    /// Shift horizontally by `frac` of the visible width (positive moves right).
    pub fn pan_x(&mut self, frac: f64) {
        let d = self.x.span() * frac;
        self.x = shift(self.x, d);
    }

    /// Shift vertically by `frac` of the visible height (positive moves up).
    pub fn pan_y(&mut self, frac: f64) {
        let d = self.y.span() * frac;
        self.y = shift(self.y, d);
    }

    /// Shift by a data-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x = shift(self.x, dx);
        self.y = shift(self.y, dy);
    }

    /// Scale both axes by `factor` (< 1 zooms in) around `anchor`, or the center.
    pub fn zoom(&mut self, factor: f64, anchor: Option<(f64, f64)>) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let (ax, ay) = anchor.unwrap_or((
            (self.x.min + self.x.max) / 2.0,
            (self.y.min + self.y.max) / 2.0,
        ));
        self.x = scale(self.x, self.home_x, factor, ax);
        self.y = scale(self.y, self.home_y, factor, ay);
    }

    /// Data-space point under a terminal cell of `plot`, if the cell is inside it.
    pub fn data_at(&self, plot: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
        if plot.width == 0
            || plot.height == 0
            || column < plot.x
            || column >= plot.x + plot.width
            || row < plot.y
            || row >= plot.y + plot.height
        {
            return None;
        }
        let fx = (column - plot.x) as f64 + 0.5;
        let fy = (row - plot.y) as f64 + 0.5;
        let x = self.x.min + self.x.span() * fx / plot.width as f64;
        let y = self.y.max - self.y.span() * fy / plot.height as f64;
        Some((x, y))
    }

    /// Data-space size of one terminal cell of `plot`.
    pub fn cell_size(&self, plot: Rect) -> (f64, f64) {
        (
            self.x.span() / plot.width.max(1) as f64,
            self.y.span() / plot.height.max(1) as f64,
        )
    }
}

fn shift(d: Domain, by: f64) -> Domain {
    Domain {
        min: d.min + by,
        max: d.max + by,
    }
}

fn scale(d: Domain, home: Domain, factor: f64, anchor: f64) -> Domain {
    let home_span = home.span().abs().max(f64::EPSILON);
    let span = (d.span() * factor).clamp(home_span * MIN_ZOOM, home_span * MAX_ZOOM);
    let ratio = span / d.span();
    Domain {
        min: anchor - (anchor - d.min) * ratio,
        max: anchor + (d.max - anchor) * ratio,
    }
}
