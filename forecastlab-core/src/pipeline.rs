//! Selection → page. The whole page is rebuilt from the dataset and the
//! selected area on every selection change.

use crate::chart::{ChartSpec, ChartStyle};
use crate::dataset::Dataset;
use crate::transform::AreaView;

/// Everything displayed for one selected area.
#[derive(Debug, Clone, PartialEq)]
pub struct PageModel {
    pub view: AreaView,
    pub chart: ChartSpec,
}

impl PageModel {
    pub fn area(&self) -> &str {
        &self.view.area
    }
}

pub fn build_page(dataset: &Dataset, area: &str, style: &ChartStyle) -> PageModel {
    let view = AreaView::build(dataset, area);
    let chart = ChartSpec::build(&view, style);
    tracing::debug!(area, layers = chart.layers.len(), "page built");
    PageModel { view, chart }
}
