use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{PipelineError, Result};
use crate::table::{AggregationResult, CleanedTable, Value};

/// Reduction applied to a metric column within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    Sum,
    Mean,
}

impl FromStr for Reduce {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Reduce::Sum),
            "mean" | "avg" | "average" => Ok(Reduce::Mean),
            other => Err(PipelineError::InvalidArgument(format!(
                "unknown reduction `{other}` (expected sum or mean)"
            ))),
        }
    }
}

/// One metric column of a grouped aggregate: which column, how to reduce
/// it, and the stable output name of the reduced column.
#[derive(Debug, Clone)]
pub struct MetricSpec {
    pub column: usize,
    pub reduce: Reduce,
    pub name: String,
}

impl MetricSpec {
    pub fn new(column: usize, reduce: Reduce, name: impl Into<String>) -> Self {
        Self {
            column,
            reduce,
            name: name.into(),
        }
    }
}

/// Count occurrences of each distinct value of `col`, ordered by descending
/// count; ties keep the value's first-seen order in the source table.
pub fn frequency_count(table: &CleanedTable, col: usize) -> AggregationResult {
    let mut entries: Vec<(String, u64)> = count_values(table, col).into_iter().collect();
    // sort_by is stable, so equal counts stay in first-seen order
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    counts_to_result(table.headers()[col].clone(), entries)
}

/// Prefix of `frequency_count` truncated to `n` rows. `n` must be positive;
/// fewer distinct values than `n` yields all of them.
pub fn top_n_by_frequency(table: &CleanedTable, col: usize, n: usize) -> Result<AggregationResult> {
    let mut result = frequency_count(table, col);
    result.rows.truncate(positive(n, "top-N by frequency")?);
    Ok(result)
}

/// Order counts per `YearMonth` bucket, ordered chronologically. The bucket
/// format is fixed-width zero-padded, so the lexicographic key order is the
/// chronological one.
pub fn monthly_volume(table: &CleanedTable) -> AggregationResult {
    let mut entries: Vec<(String, u64)> =
        count_values(table, table.year_month_index()).into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    counts_to_result("Month".to_string(), entries)
}

/// Group rows by the composite key formed from `group_cols` and reduce each
/// metric column over the group. One row per distinct key, keys in
/// first-seen order, columns renamed to the group headers followed by each
/// metric's output name.
pub fn grouped_aggregate(
    table: &CleanedTable,
    group_cols: &[usize],
    metrics: &[MetricSpec],
) -> Result<AggregationResult> {
    if group_cols.is_empty() {
        return Err(PipelineError::InvalidArgument(
            "grouped aggregate needs at least one group column".into(),
        ));
    }

    struct Group {
        count: u64,
        sums: Vec<f64>,
    }

    let mut groups: IndexMap<Vec<String>, Group> = IndexMap::new();
    for row in table.rows() {
        let key: Vec<String> = group_cols.iter().map(|&c| row[c].render()).collect();
        let group = groups.entry(key).or_insert_with(|| Group {
            count: 0,
            sums: vec![0.0; metrics.len()],
        });
        group.count += 1;
        for (slot, metric) in group.sums.iter_mut().zip(metrics) {
            *slot += row[metric.column].as_number().unwrap_or(0.0);
        }
    }

    let mut headers: Vec<String> = group_cols
        .iter()
        .map(|&c| table.headers()[c].clone())
        .collect();
    headers.extend(metrics.iter().map(|m| m.name.clone()));

    let rows = groups
        .into_iter()
        .map(|(key, group)| {
            let mut row: Vec<Value> = key.into_iter().map(Value::Text).collect();
            for (metric, sum) in metrics.iter().zip(group.sums) {
                let reduced = match metric.reduce {
                    Reduce::Sum => sum,
                    // group.count is the group's own row count; dropped rows
                    // never reach the aggregator
                    Reduce::Mean => sum / group.count as f64,
                };
                row.push(Value::Number(reduced));
            }
            row
        })
        .collect();

    Ok(AggregationResult { headers, rows })
}

/// `grouped_aggregate` over a single metric, followed by a stable sort on
/// the reduced value (ties keep first-seen key order) and truncation to `n`.
pub fn top_n_by_metric(
    table: &CleanedTable,
    group_cols: &[usize],
    metric: MetricSpec,
    n: usize,
    descending: bool,
) -> Result<AggregationResult> {
    let n = positive(n, "top-N by metric")?;
    let mut result = grouped_aggregate(table, group_cols, std::slice::from_ref(&metric))?;
    let metric_col = result.width() - 1;
    result.rows.sort_by(|a, b| {
        let x = a[metric_col].as_number().unwrap_or(0.0);
        let y = b[metric_col].as_number().unwrap_or(0.0);
        if descending {
            y.total_cmp(&x)
        } else {
            x.total_cmp(&y)
        }
    });
    result.rows.truncate(n);
    Ok(result)
}

fn count_values(table: &CleanedTable, col: usize) -> IndexMap<String, u64> {
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for row in table.rows() {
        *counts.entry(row[col].render()).or_insert(0) += 1;
    }
    counts
}

fn counts_to_result(value_header: String, entries: Vec<(String, u64)>) -> AggregationResult {
    AggregationResult {
        headers: vec![value_header, "Count".to_string()],
        rows: entries
            .into_iter()
            .map(|(value, count)| vec![Value::Text(value), Value::Number(count as f64)])
            .collect(),
    }
}

fn positive(n: usize, op: &str) -> Result<usize> {
    if n == 0 {
        return Err(PipelineError::InvalidArgument(format!(
            "{op}: n must be a positive integer"
        )));
    }
    Ok(n)
}
