//! Backend-independent chart model.
//!
//! A `ChartSpec` is an ordered list of layers with explicit z-order:
//! confidence band (z=1), one line per series (z=2), forecast-start rule
//! (z=3). Renderers walk `layers` front to back and never reorder them.

pub mod layer;
pub mod style;

use chrono::NaiveDate;

pub use layer::{date_to_x, x_to_date, BandLayer, BandPoint, Layer, LayerKind, LineLayer, RuleLayer};
pub use style::{ChartStyle, Rgb, StrokeDash};

use crate::domain::Series;
use crate::format::format_value;
use crate::transform::AreaView;

/// Closed numeric interval of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const UNIT: Domain = Domain { min: 0.0, max: 1.0 };

    /// Extent of the values, or `None` if there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Domain>, v| match acc {
                None => Some(Domain { min: v, max: v }),
                Some(d) => Some(Domain {
                    min: d.min.min(v),
                    max: d.max.max(v),
                }),
            })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Widen by `frac` of the span on both sides; a zero-width domain is widened by ±1.
    pub fn padded(self, frac: f64) -> Self {
        let span = self.span();
        if span.abs() < f64::EPSILON {
            return Domain {
                min: self.min - 1.0,
                max: self.max + 1.0,
            };
        }
        Domain {
            min: self.min - span * frac,
            max: self.max + span * frac,
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Hover content for one data point.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub date: NaiveDate,
    pub series: Series,
    pub value: f64,
}

impl Tooltip {
    pub fn formatted_value(&self) -> String {
        format_value(self.value)
    }
}

/// Everything shown when hovering one date.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub date: NaiveDate,
    pub x: f64,
    pub tooltips: Vec<Tooltip>,
    /// Rule tooltip when hovering the forecast start date.
    pub rule: Option<String>,
}

/// The composed chart for one area.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    /// Sorted by ascending `z`; draw in this order.
    pub layers: Vec<Layer>,
    pub x_domain: Domain,
    pub y_domain: Domain,
    dates: Vec<NaiveDate>,
    points: Vec<Tooltip>,
}

impl ChartSpec {
    pub fn build(view: &AreaView, style: &ChartStyle) -> Self {
        let mut layers = Vec::with_capacity(Series::ALL.len() + 2);

        let mut band_points: Vec<BandPoint> = view
            .band
            .iter()
            .filter_map(|r| match (r.lower_95_ci, r.upper_95_ci) {
                (Some(lower), Some(upper)) => Some(BandPoint {
                    x: date_to_x(r.date),
                    lower,
                    upper,
                }),
                _ => None,
            })
            .collect();
        band_points.sort_by(|a, b| a.x.total_cmp(&b.x));
        layers.push(Layer::band(BandLayer {
            points: band_points,
            color: style.band_color,
            opacity: style.band_opacity,
        }));

        // Series drawn in descending name order.
        let mut series_order = Series::ALL;
        series_order.sort_by(|a, b| b.column().cmp(a.column()));
        for series in series_order {
            let mut obs: Vec<(NaiveDate, Option<f64>)> =
                view.series_rows(series).map(|r| (r.date, r.value)).collect();
            obs.sort_by_key(|(date, _)| *date);
            layers.push(Layer::line(LineLayer {
                series,
                color: style.series_color(series),
                stroke: style.series_stroke(series),
                segments: split_segments(&obs),
            }));
        }

        if let Some(date) = view.forecast_start {
            layers.push(Layer::rule(RuleLayer {
                date,
                x: date_to_x(date),
                color: style.rule_color,
                opacity: style.rule_opacity,
                width: style.rule_width,
                tooltip: format!("Forecast Start Date: {date}"),
            }));
        }

        layers.sort_by_key(|l| l.z);

        let mut dates: Vec<NaiveDate> = view.rows.iter().map(|r| r.date).collect();
        dates.sort();
        dates.dedup();

        let mut points: Vec<Tooltip> = view
            .long_rows
            .iter()
            .filter_map(|r| {
                r.value.map(|value| Tooltip {
                    date: r.date,
                    series: r.series,
                    value,
                })
            })
            .collect();
        points.sort_by_key(|t| (t.date, t.series));

        let x_domain = Domain::from_values(dates.iter().map(|d| date_to_x(*d)))
            .map(|d| d.padded(0.0))
            .unwrap_or(Domain::UNIT);
        let y_values = points.iter().map(|t| t.value).chain(
            layers
                .iter()
                .filter_map(|l| match &l.kind {
                    LayerKind::Band(b) => Some(b),
                    _ => None,
                })
                .flat_map(|b| b.points.iter().flat_map(|p| [p.lower, p.upper])),
        );
        let y_domain = Domain::from_values(y_values)
            .map(|d| d.padded(0.05))
            .unwrap_or(Domain::UNIT);

        Self {
            title: format!("Forecast Analysis for {}", view.area),
            layers,
            x_domain,
            y_domain,
            dates,
            points,
        }
    }

    pub fn band(&self) -> Option<&BandLayer> {
        self.layers.iter().find_map(|l| match &l.kind {
            LayerKind::Band(b) => Some(b),
            _ => None,
        })
    }

    pub fn line(&self, series: Series) -> Option<&LineLayer> {
        self.layers.iter().find_map(|l| match &l.kind {
            LayerKind::Line(line) if line.series == series => Some(line),
            _ => None,
        })
    }

    pub fn rule(&self) -> Option<&RuleLayer> {
        self.layers.iter().find_map(|l| match &l.kind {
            LayerKind::Rule(r) => Some(r),
            _ => None,
        })
    }

    /// Distinct dates of the view, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Date closest to `x`, ties going to the earlier date.
    pub fn nearest_date(&self, x: f64) -> Option<NaiveDate> {
        if self.dates.is_empty() || !x.is_finite() {
            return None;
        }
        let idx = self.dates.partition_point(|d| date_to_x(*d) < x);
        let after = self.dates.get(idx);
        let before = idx.checked_sub(1).and_then(|i| self.dates.get(i));
        match (before, after) {
            (Some(b), Some(a)) => {
                if x - date_to_x(*b) <= date_to_x(*a) - x {
                    Some(*b)
                } else {
                    Some(*a)
                }
            }
            (Some(b), None) => Some(*b),
            (None, Some(a)) => Some(*a),
            (None, None) => None,
        }
    }

    /// Move `delta` dates from `from` (or from the first date when `None`), clamped.
    pub fn step_date(&self, from: Option<NaiveDate>, delta: isize) -> Option<NaiveDate> {
        let last = self.dates.len().checked_sub(1)?;
        let current = match from {
            Some(d) => self.dates.partition_point(|x| *x < d).min(last),
            None => return self.dates.first().copied(),
        };
        let next = (current as isize + delta).clamp(0, last as isize) as usize;
        self.dates.get(next).copied()
    }

    /// Tooltips for every present value on the date nearest to `x`.
    pub fn hover_at(&self, x: f64) -> Option<HoverInfo> {
        let date = self.nearest_date(x)?;
        Some(self.hover_on(date))
    }

    pub fn hover_on(&self, date: NaiveDate) -> HoverInfo {
        let start = self.points.partition_point(|t| t.date < date);
        let tooltips = self.points[start..]
            .iter()
            .take_while(|t| t.date == date)
            .cloned()
            .collect();
        let rule = self
            .rule()
            .filter(|r| r.date == date)
            .map(|r| r.tooltip.clone());
        HoverInfo {
            date,
            x: date_to_x(date),
            tooltips,
            rule,
        }
    }
}

/// Split date-ordered observations into runs of present values.
fn split_segments(obs: &[(NaiveDate, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (date, value) in obs {
        match value {
            Some(v) if v.is_finite() => current.push((date_to_x(*date), *v)),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::domain::Record;

    fn d(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
    }

    /// Jan–Mar actuals and fit, Apr–Jun both forecasts with a band.
    fn north() -> AreaView {
        let mut records = Vec::new();
        for m in 1..=6 {
            let mut r = Record::new("North", d(m));
            if m <= 3 {
                r.actual = Some(100.0 + m as f64);
                r.prophet_train_fitted = Some(99.0 + m as f64);
            } else {
                r.prophet_forecast = Some(100.0 + m as f64);
                r.auto_arima_forecast = Some(101.0 + m as f64);
                r.lower_95_ci = Some(90.0 + m as f64);
                r.upper_95_ci = Some(110.0 + m as f64);
            }
            records.push(r);
        }
        AreaView::build(&Dataset::new(records), "North")
    }

    #[test]
    fn layers_are_ordered_band_lines_rule() {
        let spec = ChartSpec::build(&north(), &ChartStyle::default());
        let names: Vec<&str> = spec.layers.iter().map(|l| l.name()).collect();
        assert_eq!(
            names,
            vec![
                "band",
                "Prophet_Train_Fitted",
                "Prophet_Forecast",
                "Auto_arima_forcasted",
                "Actual",
                "rule"
            ]
        );
        assert!(spec.layers.windows(2).all(|w| w[0].z <= w[1].z));
        assert_eq!(spec.title, "Forecast Analysis for North");
    }

    #[test]
    fn north_scenario() {
        let spec = ChartSpec::build(&north(), &ChartStyle::default());

        let rule = spec.rule().unwrap();
        assert_eq!(rule.date, d(3));
        assert_eq!(rule.tooltip, "Forecast Start Date: 2024-03-01");

        let band = spec.band().unwrap();
        assert_eq!(band.points.len(), 3);
        assert_eq!(band.points[0].x, date_to_x(d(4)));

        let forecast = spec.line(Series::ProphetForecast).unwrap();
        assert!(matches!(forecast.stroke, StrokeDash::Dashed { .. }));
        assert_eq!(forecast.segments, vec![vec![
            (date_to_x(d(4)), 104.0),
            (date_to_x(d(5)), 105.0),
            (date_to_x(d(6)), 106.0),
        ]]);

        let actual = spec.line(Series::Actual).unwrap();
        assert_eq!(actual.stroke, StrokeDash::Solid);
        assert_eq!(actual.point_count(), 3);
        assert!(actual.segments[0].iter().all(|(x, _)| *x <= date_to_x(d(3))));
    }

    #[test]
    fn no_forecast_has_empty_band_and_no_rule() {
        let mut records = Vec::new();
        for m in 1..=4 {
            let mut r = Record::new("South", d(m));
            r.actual = Some(m as f64);
            records.push(r);
        }
        let view = AreaView::build(&Dataset::new(records), "South");
        let spec = ChartSpec::build(&view, &ChartStyle::default());
        assert!(spec.rule().is_none());
        assert!(spec.band().unwrap().points.is_empty());
        for layer in spec.layers.iter() {
            if let LayerKind::Line(line) = &layer.kind {
                if line.point_count() > 0 {
                    assert_eq!(line.stroke, StrokeDash::Solid);
                }
            }
        }
    }

    #[test]
    fn missing_values_split_lines() {
        let obs = vec![(d(1), Some(1.0)), (d(2), None), (d(3), Some(3.0)), (d(4), Some(4.0))];
        let segments = split_segments(&obs);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 1);
        assert_eq!(segments[1].len(), 2);
    }

    #[test]
    fn empty_view_renders_empty_layers() {
        let view = AreaView::build(&Dataset::empty(), "Nowhere");
        let spec = ChartSpec::build(&view, &ChartStyle::default());
        assert_eq!(spec.layers.len(), 5);
        assert_eq!(spec.x_domain, Domain::UNIT);
        assert_eq!(spec.y_domain, Domain::UNIT);
        assert!(spec.hover_at(0.5).is_none());
    }

    #[test]
    fn domains_cover_lines_and_band() {
        let spec = ChartSpec::build(&north(), &ChartStyle::default());
        assert_eq!(spec.x_domain.min, date_to_x(d(1)));
        assert_eq!(spec.x_domain.max, date_to_x(d(6)));
        // Band runs 94..116; padded by 5% of the 22-wide span.
        assert!(spec.y_domain.min < 94.0 && spec.y_domain.min > 92.0);
        assert!(spec.y_domain.max > 116.0 && spec.y_domain.max < 118.0);
    }

    #[test]
    fn hover_reports_values_and_rule() {
        let spec = ChartSpec::build(&north(), &ChartStyle::default());
        let hover = spec.hover_at(date_to_x(d(3)) + 3.0).unwrap();
        assert_eq!(hover.date, d(3));
        let labels: Vec<(Series, String)> = hover
            .tooltips
            .iter()
            .map(|t| (t.series, t.formatted_value()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (Series::Actual, "103.00".to_string()),
                (Series::ProphetTrainFitted, "102.00".to_string()),
            ]
        );
        assert_eq!(hover.rule.as_deref(), Some("Forecast Start Date: 2024-03-01"));

        let later = spec.hover_on(d(5));
        assert_eq!(later.tooltips.len(), 2);
        assert!(later.rule.is_none());
    }

    #[test]
    fn stepping_through_dates_is_clamped() {
        let spec = ChartSpec::build(&north(), &ChartStyle::default());
        assert_eq!(spec.step_date(None, 1), Some(d(1)));
        assert_eq!(spec.step_date(Some(d(1)), 2), Some(d(3)));
        assert_eq!(spec.step_date(Some(d(6)), 1), Some(d(6)));
        assert_eq!(spec.step_date(Some(d(1)), -1), Some(d(1)));
    }
}
