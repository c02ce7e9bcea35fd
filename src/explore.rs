use std::fmt;

use crate::table::{ColumnType, RawTable, Value};

/// Describe stats over a numeric column's non-missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub ty: ColumnType,
    pub nulls: usize,
    /// Present only for numeric columns with at least one value.
    pub stats: Option<NumericStats>,
}

/// Shape and per-column profile of a loaded dataset. Structured, so the
/// caller decides how to present it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

pub fn summarize(table: &RawTable) -> TableSummary {
    let columns = table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut nulls = 0usize;
            let mut count = 0usize;
            let mut sum = 0.0f64;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for row in &table.rows {
                match row.get(idx) {
                    Some(Value::Number(n)) => {
                        count += 1;
                        sum += n;
                        min = min.min(*n);
                        max = max.max(*n);
                    }
                    Some(Value::Text(_)) => {}
                    Some(Value::Null) | None => nulls += 1,
                }
            }
            let stats = (table.types[idx] == ColumnType::Numeric && count > 0).then(|| {
                NumericStats {
                    count,
                    min,
                    max,
                    mean: sum / count as f64,
                }
            });
            ColumnSummary {
                name: name.clone(),
                ty: table.types[idx],
                nulls,
                stats,
            }
        })
        .collect();

    TableSummary {
        rows: table.num_rows(),
        columns,
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} rows x {} columns", self.rows, self.columns.len())?;
        for col in &self.columns {
            write!(f, "  {} ({:?}), {} missing", col.name, col.ty, col.nulls)?;
            if let Some(s) = &col.stats {
                write!(
                    f,
                    "; count={} min={} max={} mean={:.2}",
                    s.count, s.min, s.max, s.mean
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_counts_nulls_and_describes_numerics() {
        let table = RawTable {
            headers: vec!["City".into(), "Amount".into()],
            types: vec![ColumnType::Categorical, ColumnType::Numeric],
            rows: vec![
                vec![Value::Text("Pune".into()), Value::Number(10.0)],
                vec![Value::Null, Value::Number(20.0)],
                vec![Value::Text("Delhi".into()), Value::Null],
            ],
        };
        let summary = summarize(&table);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns[0].nulls, 1);
        assert!(summary.columns[0].stats.is_none());
        let stats = summary.columns[1].stats.as_ref().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 20.0);
        assert_eq!(stats.mean, 15.0);
    }
}
