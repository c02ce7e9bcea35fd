mod derive;

pub use derive::derive_column_types;

use std::fmt;

/// A single cell. Numeric columns carry `Number`, everything else `Text`;
/// `Null` marks a missing field until the cleaner fills or drops it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render for output: `Null` is the empty field, integral numbers
    /// drop the trailing `.0`.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Declared type of a column, derived once at load from cell samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// A freshly loaded table: headers, per-column types, and rows in the
/// original file order. Mutated only by the cleaner.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub types: Vec<ColumnType>,
    pub rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }
}

/// A table that has been through the cleaner: no nulls remain, every row's
/// order date parsed, and a derived `YearMonth` column is present. The
/// aggregation and export APIs accept only this type, so operating on
/// uncleaned data is not representable there.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    table: RawTable,
    date_col: usize,
    year_month: usize,
}

impl CleanedTable {
    pub(crate) fn new(table: RawTable, date_col: usize, year_month: usize) -> Self {
        Self {
            table,
            date_col,
            year_month,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.table.rows
    }

    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    pub fn date_index(&self) -> usize {
        self.date_col
    }

    pub fn year_month_index(&self) -> usize {
        self.year_month
    }

    /// Unwrap back to a `RawTable`, e.g. to re-run cleaning over it.
    pub fn into_raw(self) -> RawTable {
        self.table
    }
}

/// One aggregation output: group-key columns followed by metric columns,
/// already renamed to their stable output names. Created fresh per call
/// and never mutated after return.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Replace the column names wholesale; `names` must match the width.
    pub fn renamed(mut self, names: &[&str]) -> Self {
        debug_assert_eq!(names.len(), self.headers.len());
        self.headers = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

impl fmt::Display for AggregationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headers.join(" | "))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(Value::render).collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_trims_integral_floats() {
        assert_eq!(Value::Number(15.0).render(), "15");
        assert_eq!(Value::Number(2.5).render(), "2.5");
        assert_eq!(Value::Null.render(), "");
        assert_eq!(Value::Text("Cash".into()).render(), "Cash");
    }

    #[test]
    fn renamed_replaces_headers() {
        let result = AggregationResult {
            headers: vec!["PaymentMode".into(), "Count".into()],
            rows: vec![vec![Value::Text("Cash".into()), Value::Number(2.0)]],
        };
        let renamed = result.renamed(&["PaymentMode", "UsageCount"]);
        assert_eq!(renamed.headers, vec!["PaymentMode", "UsageCount"]);
        assert_eq!(renamed.len(), 1);
    }
}
