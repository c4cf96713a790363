//! Chart models and the window that displays them.
//!
//! Charts are plain data ([`GroupedBarChart`], [`Heatmap`]) built from an
//! [`AnalysisReport`] by [`build_charts`]. Their layout is computed in unit
//! space and only mapped to pixels when painted, so everything except the
//! window itself is testable headless.
//!
//! [`show_blocking`] opens one native window and shows the charts in order.
//! Closing the window moves on to the next chart; the call returns once the
//! last chart has been closed.

pub mod axis;
pub mod bar;
pub mod heatmap;
mod viewer;

pub use bar::{BarRect, BarSeries, GroupedBarChart};
pub use heatmap::{Heatmap, coolwarm};

use crate::error::{AnalysisError, Result};
use crate::types::AnalysisReport;
use eframe::egui;
use tracing::info;
use viewer::ChartViewer;

pub const AREA_CHART_TITLE: &str = "Pollution Levels by Area Category";
pub const AREA_CHART_X_LABEL: &str = "Area Category";
pub const STATE_CHART_TITLE: &str = "State-wise Average Pollution (SO2 & NO2)";
pub const CORRELATION_CHART_TITLE: &str = "Correlation between Pollutants";
pub const CONCENTRATION_LABEL: &str = "Concentration (µg/m³)";

/// A chart ready to be painted.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Bars(GroupedBarChart),
    Heatmap(Heatmap),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            Self::Bars(chart) => &chart.title,
            Self::Heatmap(chart) => &chart.title,
        }
    }

    fn inner_size(&self) -> [f32; 2] {
        match self {
            Self::Bars(chart) if chart.rotate_labels => [1400.0, 600.0],
            Self::Bars(_) => [1000.0, 600.0],
            Self::Heatmap(_) => [800.0, 650.0],
        }
    }
}

/// The three charts of a report: area bars, state bars, correlation heatmap.
pub fn build_charts(report: &AnalysisReport) -> Vec<ChartSpec> {
    let area = GroupedBarChart::from_aggregate(
        &report.area_aggregate,
        AREA_CHART_TITLE,
        AREA_CHART_X_LABEL,
        CONCENTRATION_LABEL,
    );

    let state = GroupedBarChart::from_aggregate(
        &report.state_aggregate,
        STATE_CHART_TITLE,
        report.state_aggregate.group_column.clone(),
        CONCENTRATION_LABEL,
    )
    .with_rotated_labels();

    let correlation = Heatmap::from_matrix(&report.correlation, CORRELATION_CHART_TITLE);

    vec![
        ChartSpec::Bars(area),
        ChartSpec::Bars(state),
        ChartSpec::Heatmap(correlation),
    ]
}

/// Show `charts` one at a time in a native window, blocking until the last
/// one is closed.
///
/// # Errors
///
/// [`AnalysisError::Render`] when the windowing backend fails, e.g. when no
/// display is available.
pub fn show_blocking(charts: Vec<ChartSpec>) -> Result<()> {
    let Some(first) = charts.first() else {
        return Ok(());
    };

    info!("Displaying {} charts", charts.len());
    let inner_size = first.inner_size();
    let title = format!("{} (1/{})", first.title(), charts.len());
    let viewer = ChartViewer::new(charts);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(inner_size)
            .with_title(title),
        ..Default::default()
    };

    eframe::run_native("airq", options, Box::new(|_cc| Ok(Box::new(viewer))))
        .map_err(|e| AnalysisError::Render(e.to_string()))
}
