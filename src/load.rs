use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::table::{derive_column_types, ColumnType, RawTable, Value};

/// Read a delimited file with a header row into a `RawTable`, preserving
/// the file's row order. Column types are derived from the cell contents;
/// empty cells become `Null`, cells of numeric columns are parsed up front.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path.as_ref())?;

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    for (idx, name) in headers.iter().enumerate() {
        if name.is_empty() {
            return Err(PipelineError::InvalidArgument(format!(
                "header at index {} is empty after trimming",
                idx
            )));
        }
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        raw_rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    let types = derive_column_types(&headers, &raw_rows);
    let rows = raw_rows
        .into_iter()
        .map(|cells| typed_row(&cells, &types, headers.len()))
        .collect::<Vec<_>>();

    info!(
        path = %path.as_ref().display(),
        rows = rows.len(),
        columns = headers.len(),
        "loaded dataset"
    );

    Ok(RawTable {
        headers,
        types,
        rows,
    })
}

fn typed_row(cells: &[String], types: &[ColumnType], width: usize) -> Vec<Value> {
    (0..width)
        .map(|i| {
            let cell = cells.get(i).map(|s| s.trim()).unwrap_or("");
            if cell.is_empty() {
                return Value::Null;
            }
            match types[i] {
                // derive_column_types already proved every non-empty cell parses
                ColumnType::Numeric => cell
                    .parse::<f64>()
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                ColumnType::Categorical => Value::Text(cell.to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn loads_headers_types_and_nulls() {
        let tmp = write_csv("Order Date,PaymentMode,Amount\n2024-01-05,Cash,10\n2024-01-20,,5\n");
        let table = load_csv(tmp.path()).unwrap();

        assert_eq!(table.headers, vec!["Order Date", "PaymentMode", "Amount"]);
        assert_eq!(
            table.types,
            vec![
                ColumnType::Categorical,
                ColumnType::Categorical,
                ColumnType::Numeric
            ]
        );
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows[0][2], Value::Number(10.0));
        assert_eq!(table.rows[1][1], Value::Null);
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let tmp = write_csv("A,B,C\nx,1\n");
        let table = load_csv(tmp.path()).unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], Value::Null);
    }

    #[test]
    fn empty_header_is_rejected() {
        let tmp = write_csv("A,,C\nx,y,z\n");
        let err = load_csv(tmp.path()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArgument(_)));
    }
}
