use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::error::Result;
use crate::table::{AggregationResult, Value};

/// The terminal export artifact: two aggregation results glued side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl CombinedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Concatenate two results column-wise by row index. This is positional,
/// not a key join: row i of `a` and row i of `b` are unrelated. The shorter
/// side is padded with empty values, so the combined row count is
/// `max(len(a), len(b))`.
pub fn combine_for_export(a: &AggregationResult, b: &AggregationResult) -> CombinedTable {
    let mut headers = a.headers.clone();
    headers.extend(b.headers.iter().cloned());

    let rows = (0..a.len().max(b.len()))
        .map(|i| {
            let mut row = Vec::with_capacity(a.width() + b.width());
            row.extend(pad(a, i));
            row.extend(pad(b, i));
            row
        })
        .collect();

    CombinedTable { headers, rows }
}

fn pad(result: &AggregationResult, i: usize) -> Vec<Value> {
    match result.rows.get(i) {
        Some(row) => row.clone(),
        None => vec![Value::Null; result.width()],
    }
}

/// Serialize the combined table verbatim: header row first, `Null` as the
/// empty field.
pub fn write_csv<P: AsRef<Path>>(table: &CombinedTable, path: P) -> Result<()> {
    let mut wtr = Writer::from_path(path.as_ref())?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(Value::render))?;
    }
    wtr.flush()?;
    info!(
        path = %path.as_ref().display(),
        rows = table.len(),
        "report exported"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn result(headers: &[&str], keys: &[&str]) -> AggregationResult {
        AggregationResult {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: keys
                .iter()
                .enumerate()
                .map(|(i, k)| vec![Value::Text(k.to_string()), Value::Number(i as f64 + 1.0)])
                .collect(),
        }
    }

    #[test]
    fn combined_row_count_is_the_max_of_both() {
        let a = result(&["Sub-Category", "Total Revenue"], &["Chairs", "Phones", "Desks"]);
        let b = result(&["Month", "Number of Orders"], &["2024-01"]);
        let combined = combine_for_export(&a, &b);

        assert_eq!(combined.len(), 3);
        assert_eq!(combined.headers.len(), 4);
        // rows past the end of the shorter side are empty on that side
        assert_eq!(combined.rows[1][2], Value::Null);
        assert_eq!(combined.rows[2][3], Value::Null);
        // and the longer side's cells come through untouched
        assert_eq!(combined.rows[2][0], Value::Text("Desks".into()));
    }

    #[test]
    fn prefix_columns_match_the_first_result() {
        let a = result(&["City", "OrderCount"], &["Pune", "Delhi"]);
        let b = result(&["Month", "Count"], &["2024-01", "2024-02"]);
        let combined = combine_for_export(&a, &b);
        for (i, row) in a.rows.iter().enumerate() {
            assert_eq!(&combined.rows[i][..a.width()], row.as_slice());
        }
    }

    #[test]
    fn csv_output_has_headers_and_empty_padding() {
        let a = result(&["City", "OrderCount"], &["Pune", "Delhi", "Goa"]);
        let b = result(&["Month", "Orders"], &["2024-01"]);
        let combined = combine_for_export(&a, &b);

        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_csv(&combined, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next().unwrap(), "City,OrderCount,Month,Orders");
        assert_eq!(lines.next().unwrap(), "Pune,1,2024-01,1");
        assert_eq!(lines.next().unwrap(), "Delhi,2,,");
        assert_eq!(lines.next().unwrap(), "Goa,3,,");
    }
}
