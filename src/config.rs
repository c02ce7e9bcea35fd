use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::table::RawTable;

/// Which header names carry each semantic column of the sales dataset.
/// Defaults match the stock dataset headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    pub order_date: String,
    pub payment_mode: String,
    pub city: String,
    pub product: String,
    pub category: String,
    pub sub_category: String,
    pub quantity: String,
    pub price: String,
    pub amount: String,
    pub profit: String,
    pub state: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            order_date: "Order Date".into(),
            payment_mode: "PaymentMode".into(),
            city: "City".into(),
            product: "Product Name".into(),
            category: "Category".into(),
            sub_category: "Sub-Category".into(),
            quantity: "Quantity".into(),
            price: "Price".into(),
            amount: "Amount".into(),
            profit: "Profit".into(),
            state: "State".into(),
        }
    }
}

/// Role → column-index bindings, validated once against the loaded table so
/// downstream code indexes by role instead of re-checking names.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColumns {
    pub order_date: usize,
    pub payment_mode: usize,
    pub city: usize,
    pub product: usize,
    pub category: usize,
    pub sub_category: usize,
    pub quantity: usize,
    pub price: usize,
    pub amount: usize,
    pub profit: usize,
    pub state: usize,
}

impl ColumnRoles {
    pub fn resolve(&self, table: &RawTable) -> Result<ResolvedColumns> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
        };
        Ok(ResolvedColumns {
            order_date: find(&self.order_date)?,
            payment_mode: find(&self.payment_mode)?,
            city: find(&self.city)?,
            product: find(&self.product)?,
            category: find(&self.category)?,
            sub_category: find(&self.sub_category)?,
            quantity: find(&self.quantity)?,
            price: find(&self.price)?,
            amount: find(&self.amount)?,
            profit: find(&self.profit)?,
            state: find(&self.state)?,
        })
    }
}

/// Run options for a batch analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnRoles,
    pub top_n: usize,
    pub output_path: PathBuf,
    /// chrono format strings tried in order against the order-date column.
    pub date_formats: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: ColumnRoles::default(),
            top_n: 10,
            output_path: PathBuf::from("top_products_and_monthly_orders.csv"),
            date_formats: vec![
                "%Y-%m-%d".into(),
                "%d-%m-%Y".into(),
                "%m/%d/%Y".into(),
                "%Y/%m/%d".into(),
            ],
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading config {}", path.as_ref().display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.as_ref().display()))
    }
}
