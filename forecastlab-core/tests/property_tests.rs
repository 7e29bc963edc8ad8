//! Property tests for the per-area transformation.
//!
//! Uses proptest to verify:
//! 1. Melt row count: every source row yields exactly one long row per series
//! 2. CI preservation: long rows carry their source row's bounds unchanged
//! 3. Forecast boundary: max date strictly before the first forecast, else none
//! 4. Idempotence: building the same view twice gives equal values

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use forecastlab_core::chart::{ChartStyle, Layer};
use forecastlab_core::domain::{Record, Series};
use forecastlab_core::transform::{forecast_start_date, melt};
use forecastlab_core::{build_page, AreaView, Dataset};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_value() -> impl Strategy<Value = Option<f64>> {
    prop::option::of((-1.0e6..1.0e6_f64).prop_map(|v| (v * 100.0).round() / 100.0))
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(vec!["North", "South", "East"]),
        0u64..400,
        prop::array::uniform4(arb_value()),
        arb_value(),
        arb_value(),
    )
        .prop_map(|(area, offset, values, lower, upper)| {
            let base = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
            let mut r = Record::new(area, base + Days::new(offset));
            for (series, value) in Series::ALL.into_iter().zip(values) {
                r.set_value(series, value);
            }
            r.lower_95_ci = lower;
            r.upper_95_ci = upper;
            r
        })
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(arb_record(), 0..60)
}

// ── 1 & 2. Melt ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn melt_yields_four_rows_per_source_row(records in arb_records()) {
        let ds = Dataset::new(records);
        for area in ds.areas() {
            let view = AreaView::build(&ds, &area);
            prop_assert_eq!(view.long_rows.len(), view.rows.len() * Series::ALL.len());
        }
    }

    #[test]
    fn long_rows_carry_source_bounds(records in arb_records()) {
        let long = melt(&records);
        let n = records.len();
        for (i, lr) in long.iter().enumerate() {
            let source = &records[i % n.max(1)];
            prop_assert_eq!(lr.date, source.date);
            prop_assert_eq!(lr.lower_95_ci, source.lower_95_ci);
            prop_assert_eq!(lr.upper_95_ci, source.upper_95_ci);
            prop_assert_eq!(lr.value, source.value(lr.series));
        }
    }
}

// ── 3. Forecast boundary ─────────────────────────────────────────────

proptest! {
    #[test]
    fn boundary_matches_definition(records in arb_records()) {
        let first_forecast = records
            .iter()
            .filter(|r| r.prophet_forecast.is_some())
            .map(|r| r.date)
            .min();
        let expected = first_forecast
            .and_then(|f| records.iter().map(|r| r.date).filter(|d| *d < f).max());
        prop_assert_eq!(forecast_start_date(&records), expected);
    }

    #[test]
    fn rule_layer_present_iff_boundary(records in arb_records()) {
        let ds = Dataset::new(records);
        let style = ChartStyle::default();
        for area in ds.areas() {
            let page = build_page(&ds, &area, &style);
            prop_assert_eq!(page.chart.rule().is_some(), page.view.forecast_start.is_some());
            prop_assert!(page.chart.layers.windows(2).all(|w| w[0].z <= w[1].z));
            if let Some(rule) = page.chart.layers.last().filter(|l| l.z == Layer::RULE_Z) {
                prop_assert_eq!(rule.name(), "rule");
            }
        }
    }
}

// ── 4. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn view_build_is_idempotent(records in arb_records()) {
        let ds = Dataset::new(records);
        for area in ds.areas() {
            prop_assert_eq!(AreaView::build(&ds, &area), AreaView::build(&ds, &area));
        }
    }
}
