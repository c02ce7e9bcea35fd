use tracing::info;

use crate::table::AggregationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    BarHorizontal,
    Line,
}

/// Axis-label hints handed to a renderer alongside a ranked table.
#[derive(Debug, Clone)]
pub struct AxisHints {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
}

impl AxisHints {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        kind: ChartKind,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            kind,
        }
    }
}

/// Boundary to the external plotting collaborator. Receives an already
/// aggregated table; nothing it produces flows back into the pipeline.
pub trait Renderer {
    fn render(&self, result: &AggregationResult, hints: &AxisHints);
}

/// Renderer that just logs the table, for batch runs with no plot sink.
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&self, result: &AggregationResult, hints: &AxisHints) {
        info!(
            title = %hints.title,
            x = %hints.x_label,
            y = %hints.y_label,
            kind = ?hints.kind,
            rows = result.len(),
            "chart"
        );
        for line in result.to_string().lines() {
            info!("  {line}");
        }
    }
}
