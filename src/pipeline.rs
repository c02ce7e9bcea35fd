use std::path::Path;

use tracing::info;

use crate::aggregate::{
    frequency_count, grouped_aggregate, monthly_volume, top_n_by_frequency, top_n_by_metric,
    MetricSpec, Reduce,
};
use crate::chart::{AxisHints, ChartKind, Renderer};
use crate::clean::clean;
use crate::config::{Config, ResolvedColumns};
use crate::error::{PipelineError, Result};
use crate::explore::{summarize, TableSummary};
use crate::export::{combine_for_export, write_csv, CombinedTable};
use crate::load::load_csv;
use crate::table::{AggregationResult, CleanedTable, RawTable};

/// One batch analysis over one dataset: owns the table through its
/// load → clean lifecycle and exposes the report presets. Reports demanded
/// before `clean()` has run fail fast with `NotCleaned` instead of touching
/// partial data.
pub struct Analysis {
    config: Config,
    raw: Option<(RawTable, ResolvedColumns)>,
    cleaned: Option<(CleanedTable, ResolvedColumns)>,
}

impl Analysis {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            raw: None,
            cleaned: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the dataset and validate every configured column role against
    /// its header row. Returns the shape/describe summary.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<TableSummary> {
        let table = load_csv(path)?;
        let columns = self.config.columns.resolve(&table)?;
        let summary = summarize(&table);
        self.raw = Some((table, columns));
        self.cleaned = None;
        Ok(summary)
    }

    /// Run the cleaner over the loaded table, consuming the raw state.
    pub fn clean(&mut self) -> Result<()> {
        let (raw, columns) = self.raw.take().ok_or(PipelineError::NotLoaded)?;
        let cleaned = clean(raw, columns.order_date, &self.config.date_formats)?;
        self.cleaned = Some((cleaned, columns));
        Ok(())
    }

    fn cleaned(&self, op: &'static str) -> Result<(&CleanedTable, &ResolvedColumns)> {
        self.cleaned
            .as_ref()
            .map(|(t, c)| (t, c))
            .ok_or(PipelineError::NotCleaned(op))
    }

    /// Payment mode usage, most used first.
    pub fn payment_methods(&self) -> Result<AggregationResult> {
        let (table, cols) = self.cleaned("payment methods")?;
        Ok(frequency_count(table, cols.payment_mode)
            .renamed(&[self.config.columns.payment_mode.as_str(), "UsageCount"]))
    }

    /// Cities ranked by order count, truncated to the configured top-N.
    pub fn city_orders(&self) -> Result<AggregationResult> {
        let (table, cols) = self.cleaned("city orders")?;
        Ok(top_n_by_frequency(table, cols.city, self.config.top_n)?
            .renamed(&[self.config.columns.city.as_str(), "OrderCount"]))
    }

    /// Orders per calendar month, chronological.
    pub fn monthly_orders(&self) -> Result<AggregationResult> {
        let (table, _) = self.cleaned("monthly orders")?;
        Ok(monthly_volume(table).renamed(&["Month", "NumberOfOrders"]))
    }

    /// Per-product average price and total quantity sold.
    pub fn product_summary(&self) -> Result<AggregationResult> {
        let (table, cols) = self.cleaned("product summary")?;
        grouped_aggregate(
            table,
            &[cols.product],
            &[
                MetricSpec::new(cols.price, Reduce::Mean, "AvgPrice"),
                MetricSpec::new(cols.quantity, Reduce::Sum, "TotalQuantity"),
            ],
        )
    }

    /// Category/sub-category pairs ranked by total revenue, top-N.
    pub fn revenue_by_subcategory(&self) -> Result<AggregationResult> {
        let (table, cols) = self.cleaned("revenue by sub-category")?;
        top_n_by_metric(
            table,
            &[cols.category, cols.sub_category],
            MetricSpec::new(cols.amount, Reduce::Sum, "TotalRevenue"),
            self.config.top_n,
            true,
        )
    }

    /// States ranked by total profit, top-N.
    pub fn profit_by_state(&self) -> Result<AggregationResult> {
        let (table, cols) = self.cleaned("profit by state")?;
        top_n_by_metric(
            table,
            &[cols.state],
            MetricSpec::new(cols.profit, Reduce::Sum, "TotalProfit"),
            self.config.top_n,
            true,
        )
    }

    /// Total profit per payment mode, most profitable first.
    pub fn profit_by_payment_mode(&self) -> Result<AggregationResult> {
        let (table, cols) = self.cleaned("profit by payment mode")?;
        top_n_by_metric(
            table,
            &[cols.payment_mode],
            MetricSpec::new(cols.profit, Reduce::Sum, "TotalProfit"),
            usize::MAX,
            true,
        )
    }

    /// Hand the four stock report charts to a renderer.
    pub fn render_charts(&self, renderer: &dyn Renderer) -> Result<()> {
        renderer.render(
            &self.revenue_by_subcategory()?,
            &AxisHints::new(
                format!("Top {} Products by Revenue", self.config.top_n),
                "Sub-Category",
                "Total Revenue",
                ChartKind::Bar,
            ),
        );
        renderer.render(
            &self.monthly_orders()?,
            &AxisHints::new(
                "Monthly Order Volume Over Time",
                "Month",
                "Number of Orders",
                ChartKind::Line,
            ),
        );
        renderer.render(
            &self.profit_by_state()?,
            &AxisHints::new(
                format!("Top {} States by Profit", self.config.top_n),
                "Total Profit",
                "State",
                ChartKind::BarHorizontal,
            ),
        );
        renderer.render(
            &self.profit_by_payment_mode()?,
            &AxisHints::new(
                "Total Profit by Payment Mode",
                "Payment Mode",
                "Total Profit",
                ChartKind::Bar,
            ),
        );
        Ok(())
    }

    /// Combine the top-revenue and monthly-volume reports side by side and
    /// write them to the configured output path. The combination is
    /// positional; the two sides share no key.
    pub fn export_reports(&self) -> Result<CombinedTable> {
        self.cleaned("export reports")?;

        let top_products = self.revenue_by_subcategory()?.renamed(&[
            "Top Product Category",
            "Sub-Category",
            "Total Revenue",
        ]);
        let mut monthly = self.monthly_orders()?.renamed(&["Month", "Number of Orders"]);
        monthly.rows.truncate(self.config.top_n);

        let combined = combine_for_export(&top_products, &monthly);
        write_csv(&combined, &self.config.output_path)?;
        info!(
            path = %self.config.output_path.display(),
            "business reports exported"
        );
        Ok(combined)
    }
}
