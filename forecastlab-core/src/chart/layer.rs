//! Drawable chart layers. X coordinates are days since the common era.

use chrono::{Datelike, NaiveDate};

use super::style::{Rgb, StrokeDash};
use crate::domain::Series;

/// Convert a date to the chart's X coordinate.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Convert an X coordinate back to the nearest date.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() || x.abs() > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Shaded region between two bounds at one X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub x: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandLayer {
    pub points: Vec<BandPoint>,
    pub color: Rgb,
    pub opacity: f64,
}

/// One series drawn as a polyline. A missing value splits the line into segments.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    pub series: Series,
    pub color: Rgb,
    pub stroke: StrokeDash,
    pub segments: Vec<Vec<(f64, f64)>>,
}

impl LineLayer {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

/// Vertical marker at a single date.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleLayer {
    pub date: NaiveDate,
    pub x: f64,
    pub color: Rgb,
    pub opacity: f64,
    pub width: u16,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Band(BandLayer),
    Line(LineLayer),
    Rule(RuleLayer),
}

/// A layer and its stacking position. Lower `z` is drawn first (underneath).
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub z: u8,
    pub kind: LayerKind,
}

impl Layer {
    pub const BAND_Z: u8 = 1;
    pub const LINE_Z: u8 = 2;
    pub const RULE_Z: u8 = 3;

    pub fn band(layer: BandLayer) -> Self {
        Self {
            z: Self::BAND_Z,
            kind: LayerKind::Band(layer),
        }
    }

    pub fn line(layer: LineLayer) -> Self {
        Self {
            z: Self::LINE_Z,
            kind: LayerKind::Line(layer),
        }
    }

    pub fn rule(layer: RuleLayer) -> Self {
        Self {
            z: Self::RULE_Z,
            kind: LayerKind::Rule(layer),
        }
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            LayerKind::Band(_) => "band",
            LayerKind::Line(l) => l.series.column(),
            LayerKind::Rule(_) => "rule",
        }
    }
}
